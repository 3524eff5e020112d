//! Manifest construction and persistence
//!
//! The manifest is the CSV hand-off file (`ID,Image,Mask`) consumed by the
//! feature-extraction tool.

mod builder;
mod record;

pub use builder::{BuildSummary, ManifestBuilder, ManifestObserver, NoopObserver};
pub use record::{Manifest, ManifestRecord, MANIFEST_HEADER};
