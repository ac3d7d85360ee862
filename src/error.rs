//! Unified error handling for the wordpulse crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`PulseErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use wordpulse::error::{Error, PulseErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(category = %err.category(), "Retrying: {}", err.describe());
//!     } else {
//!         eprintln!("Fatal error: {}", err);
//!     }
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::analytics::error::AnalysisError;
pub use crate::provider::error::ProviderError;
pub use crate::scheduler::error::SchedulerError;

/// Common trait for all wordpulse error types
pub trait PulseErrorTrait: std::error::Error {
    /// Check if this error is recoverable (the next cycle may succeed)
    fn is_recoverable(&self) -> bool;

    /// Short user-facing description
    fn describe(&self) -> String;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid analysis parameters
    Analysis,
    /// Snapshot fetching and parsing
    Ingestion,
    /// Configuration and validation errors
    Config,
    /// Scheduler and task errors
    Scheduler,
    /// File and I/O errors
    Storage,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Human-readable category name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Ingestion => "ingestion",
            Self::Config => "config",
            Self::Scheduler => "scheduler",
            Self::Storage => "storage",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the wordpulse crate
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid analysis parameters
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Snapshot provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Scheduler and task errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PulseErrorTrait for AnalysisError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        format!("Invalid analysis parameters: {self}")
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::CapacityTooSmall { .. } | Self::OverlappingWindows { .. } => ErrorCategory::Config,
            Self::InvalidWindowSize { .. }
            | Self::WindowsTooLarge { .. }
            | Self::InvalidThreshold { .. } => ErrorCategory::Analysis,
        }
    }
}

impl PulseErrorTrait for ProviderError {
    fn is_recoverable(&self) -> bool {
        ProviderError::is_recoverable(self)
    }

    fn describe(&self) -> String {
        match self {
            Self::NotConfigured(metric) => format!("No snapshot source for {metric}"),
            other => format!("Snapshot fetch failed: {other}"),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::NotConfigured(_) => ErrorCategory::Config,
            Self::Io { .. } => ErrorCategory::Storage,
            _ => ErrorCategory::Ingestion,
        }
    }
}

impl PulseErrorTrait for SchedulerError {
    fn is_recoverable(&self) -> bool {
        SchedulerError::is_recoverable(self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } => ErrorCategory::Config,
            Self::TaskFailed { .. } => ErrorCategory::Scheduler,
        }
    }
}

impl PulseErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Analysis(e) => PulseErrorTrait::is_recoverable(e),
            Self::Provider(e) => PulseErrorTrait::is_recoverable(e),
            Self::Scheduler(e) => PulseErrorTrait::is_recoverable(e),
            Self::Io(_) => true, // I/O errors are often transient
            Self::Json(_) | Self::Toml(_) => false,
            Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Analysis(e) => e.describe(),
            Self::Provider(e) => e.describe(),
            Self::Scheduler(e) => e.describe(),
            Self::Io(e) => format!("I/O failure: {e}"),
            Self::Json(e) => format!("Invalid JSON: {e}"),
            Self::Toml(e) => format!("Invalid TOML: {e}"),
            Self::Config(msg) => format!("Invalid configuration: {msg}"),
            Self::Other { context, .. } => context.clone(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Analysis(e) => e.category(),
            Self::Provider(e) => e.category(),
            Self::Scheduler(e) => e.category(),
            Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Ingestion,
            Self::Toml(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: Some(err.into()),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
