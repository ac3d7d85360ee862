//! Error types for the scheduler module

use std::fmt;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler-specific errors
#[derive(Debug)]
pub enum SchedulerError {
    /// Scheduler configuration error
    ConfigError {
        field: String,
        reason: String,
    },

    /// The ingestion task panicked or was aborted
    TaskFailed {
        reason: String,
    },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { field, reason } => {
                write!(f, "Scheduler config error in '{}': {}", field, reason)
            }
            Self::TaskFailed { reason } => {
                write!(f, "Ingestion task failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for SchedulerError {}

impl From<tokio::task::JoinError> for SchedulerError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed {
            reason: err.to_string(),
        }
    }
}

impl SchedulerError {
    /// Create a config error
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ConfigError { .. } => false,
            Self::TaskFailed { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchedulerError::config("interval", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Scheduler config error in 'interval': must be greater than zero"
        );
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_from_join_error() {
        let handle = tokio::spawn(async { panic!("boom") });
        let err: SchedulerError = handle.await.unwrap_err().into();

        assert!(matches!(err, SchedulerError::TaskFailed { .. }));
        assert!(err.is_recoverable());
    }
}
