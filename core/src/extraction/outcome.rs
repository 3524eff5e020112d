use std::fmt;

/// Result of one feature-extraction run
///
/// Failures are values, not errors: the caller decides whether a failed or
/// missing tool should stop the process.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(tag = "status", rename_all = "snake_case"))]
pub enum ExtractionOutcome {
    /// Tool exited with status 0
    Success,

    /// Tool ran but exited non-zero (or was killed, leaving no exit code)
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Tool could not be resolved or started
    ToolNotAvailable { program: String, detail: String },
}

impl ExtractionOutcome {
    /// Returns whether the tool completed successfully
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success)
    }

    /// Exit code of the tool, when it ran and exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExtractionOutcome::Success => Some(0),
            ExtractionOutcome::Failed { exit_code, .. } => *exit_code,
            ExtractionOutcome::ToolNotAvailable { .. } => None,
        }
    }

    /// Captured diagnostic text, empty on success
    pub fn stderr(&self) -> &str {
        match self {
            ExtractionOutcome::Failed { stderr, .. } => stderr,
            ExtractionOutcome::ToolNotAvailable { detail, .. } => detail,
            ExtractionOutcome::Success => "",
        }
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            ExtractionOutcome::Success => "success",
            ExtractionOutcome::Failed { .. } => "failed",
            ExtractionOutcome::ToolNotAvailable { .. } => "tool not available",
        }
    }
}

impl fmt::Display for ExtractionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionOutcome::Success => write!(f, "success"),
            ExtractionOutcome::Failed {
                exit_code: Some(code),
                ..
            } => write!(f, "failed with exit code {}", code),
            ExtractionOutcome::Failed {
                exit_code: None, ..
            } => write!(f, "failed without exit code"),
            ExtractionOutcome::ToolNotAvailable { program, detail } => {
                write!(f, "{} is not available: {}", program, detail)
            }
        }
    }
}
