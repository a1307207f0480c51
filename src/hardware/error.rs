//! Location source error types and handling

use thiserror::Error;

/// Errors raised while reading a fix from a location source
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The location command could not be started
    #[error("Failed to launch '{command}': {reason}")]
    LaunchFailed { command: String, reason: String },
    /// No answer before the deadline
    #[error("Location source timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    /// The command ran but reported failure
    #[error("'{command}' exited with status {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    /// Output could not be turned into a fix
    #[error("Invalid location output: {details}")]
    InvalidOutput { details: String },
    /// The source has been shut down or disconnected
    #[error("Location source '{name}' is unavailable")]
    Unavailable { name: String },
}

/// Result type for location source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Error recovery strategy for source failures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecoveryStrategy {
    /// Try again on the next reporting cycle
    RetryNextCycle,
    /// Wait before the next attempt
    RetryWithDelay { delay_ms: u32 },
    /// Give up, the configuration is wrong
    Fail,
}

impl SourceError {
    /// Get the recommended recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            SourceError::LaunchFailed { .. } => RecoveryStrategy::Fail,
            SourceError::Timeout { .. } => RecoveryStrategy::RetryNextCycle,
            SourceError::CommandFailed { .. } => RecoveryStrategy::RetryWithDelay { delay_ms: 1000 },
            SourceError::InvalidOutput { .. } => RecoveryStrategy::RetryNextCycle,
            SourceError::Unavailable { .. } => RecoveryStrategy::Fail,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.recovery_strategy(), RecoveryStrategy::Fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        assert!(SourceError::Timeout { timeout_ms: 10 }.is_recoverable());
        assert!(SourceError::InvalidOutput { details: "x".into() }.is_recoverable());
        assert!(!SourceError::LaunchFailed {
            command: "termux-location".into(),
            reason: "not found".into()
        }
        .is_recoverable());
        assert_eq!(
            SourceError::CommandFailed {
                command: "c".into(),
                code: Some(1),
                stderr: String::new()
            }
            .recovery_strategy(),
            RecoveryStrategy::RetryWithDelay { delay_ms: 1000 }
        );
    }

    #[test]
    fn test_display() {
        let error = SourceError::Timeout { timeout_ms: 10000 };
        assert_eq!(error.to_string(), "Location source timed out after 10000ms");
    }
}
