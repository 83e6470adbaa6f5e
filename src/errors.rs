//! Error types for Schnitzel
//!
//! Learner mistakes are not errors: a failed check is an `Ok(false)` and is
//! retried in place. Everything in here ends the session.

use thiserror::Error;

/// Main error type for the tutorial
#[derive(Error, Debug)]
pub enum TutorialError {
    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Host operating system has no known `stat` dialect
    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(String),

    /// An external command ran but exited unsuccessfully
    #[error("Command `{command}` failed with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// Progress log could not be parsed
    #[error("Progress log line {line}: {reason}")]
    ProgressLogError { line: usize, reason: String },

    /// Terminal input errors
    #[error("Input error: {0}")]
    InputError(String),

    /// Generic errors with context
    #[error("Tutorial error: {0}")]
    Generic(String),
}

/// Result type alias for tutorial operations
pub type Result<T> = std::result::Result<T, TutorialError>;

/// Convert anyhow errors to TutorialError
impl From<anyhow::Error> for TutorialError {
    fn from(err: anyhow::Error) -> Self {
        TutorialError::Generic(err.to_string())
    }
}

impl TutorialError {
    /// Whether the failure came from an external command that did run
    pub fn is_command_failure(&self) -> bool {
        matches!(self, TutorialError::CommandFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TutorialError::ProgressLogError {
            line: 3,
            reason: "invalid index 'x'".to_string(),
        };
        assert!(err.to_string().contains("line 3"));
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_command_failed_error() {
        let err = TutorialError::CommandFailed {
            command: "stat -c %U /nope".to_string(),
            status: 1,
            stderr: "No such file or directory".to_string(),
        };
        assert!(err.is_command_failure());
        assert!(err.to_string().contains("stat -c %U"));
        assert!(!TutorialError::ConfigError("x".to_string()).is_command_failure());
    }
}
