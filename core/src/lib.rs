pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod manifest;
pub mod search;
pub mod types;

pub use api::{RadiomicsPipeline, RunReport};
pub use cli::report::TextReport;
pub use error::{RadprepError, Result};
pub use extraction::{ExtractionOutcome, ExtractionRequest};
pub use manifest::{
    BuildSummary, Manifest, ManifestBuilder, ManifestObserver, ManifestRecord, NoopObserver,
};
pub use search::{find_first_regular_file, FileIndex};
pub use types::*;
