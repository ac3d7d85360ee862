//! Error types for snapshot providers

use std::path::PathBuf;
use thiserror::Error;

use crate::models::MetricKind;

/// Errors that can occur while fetching a snapshot
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Reading the source failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source content could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A required CSV column is absent from the header
    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    /// No source configured for the metric
    #[error("No source configured for metric '{0}'")]
    NotConfigured(MetricKind),

    /// Upstream fetch failed for another reason
    #[error("Fetch failed: {0}")]
    Other(String),
}

impl ProviderError {
    /// Check if the next cycle may succeed without intervention
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io { .. } | Self::Other(_) => true,
            // Files are rewritten between cycles, so bad content may clear up
            Self::Parse { .. } => true,
            Self::MissingColumn { .. } | Self::NotConfigured(_) => false,
        }
    }
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
