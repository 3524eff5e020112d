//! Core type definitions for radiomics preparation
//!
//! This module provides the fundamental types used throughout the radprep library:
//! - [`MaskSubtype`]: The two mask kinds paired with each image ("all", "bone")
//! - [`FeatureFormat`]: Output formats understood by the extraction tool
//! - [`CaseKey`]: One (type, side, index) point of the identifier space
//! - [`CaseId`]: Manifest row key `{subtype}_{side}_{type}_{index}`
//! - [`PrepConfig`]: Immutable search configuration for a run

mod case;
mod config;
mod enums;

pub use case::{CaseId, CaseKey};
pub use config::{
    PrepConfig, DEFAULT_MANIFEST_FILE, DEFAULT_MAX_INDEX, DEFAULT_SIDES, DEFAULT_TYPE_CODES,
    MAX_INDEX_PAD_WIDTH,
};
pub use enums::{FeatureFormat, MaskSubtype, MASK_SUBTYPES};
