//! Filename pattern generation and recursive file lookup
//!
//! Patterns are plain globs matched against file names anywhere below the
//! search root. Selection is always "first regular file, pattern order then
//! discovery order".

mod index;
mod patterns;

pub use index::{find_first_regular_file, FileIndex};
pub use patterns::{
    build_matcher, escape_glob, image_patterns, mask_patterns, mask_suffix, NamingConvention,
    IMAGE_SUFFIX, NAMING_CONVENTIONS,
};
