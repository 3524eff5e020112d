//! External feature-extraction invocation
//!
//! The tool itself is opaque: it receives the manifest and output options on
//! its command line and reports through its exit status.

mod outcome;
mod request;

pub use outcome::ExtractionOutcome;
pub use request::{ExtractionRequest, DEFAULT_JOBS, DEFAULT_OUTPUT_FILE, DEFAULT_TOOL};
