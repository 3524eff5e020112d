use thiserror::Error;

/// Result type for radprep operations
pub type Result<T> = std::result::Result<T, RadprepError>;

/// Error types for radprep operations
#[derive(Error, Debug)]
pub enum RadprepError {
    /// Filename pattern could not be compiled into a glob
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Configuration rejected before any work was done
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Case identifier does not follow `{subtype}_{side}_{type}_{index}`
    #[error("Invalid case id: {0}")]
    InvalidCaseId(String),

    /// Manifest file exists but is not in the expected shape
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<globset::Error> for RadprepError {
    fn from(e: globset::Error) -> Self {
        RadprepError::InvalidPattern(format!("{}", e))
    }
}
