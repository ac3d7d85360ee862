//! Error types for the analytics module

use thiserror::Error;

/// Errors caused by invalid analysis parameters
///
/// Running short of history is not an error; it is reported through
/// [`AnalysisOutcome::InsufficientHistory`](crate::models::AnalysisOutcome).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid window size for '{window}': {size}")]
    InvalidWindowSize { window: &'static str, size: usize },

    #[error("Windows of {current} and {baseline} snapshots exceed any buffer size")]
    WindowsTooLarge { current: usize, baseline: usize },

    #[error("Invalid threshold for '{name}': {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error(
        "Baseline window [0, {baseline_end}) overlaps current window [{current_start}, {len})"
    )]
    OverlappingWindows {
        baseline_end: usize,
        current_start: usize,
        len: usize,
    },

    #[error("Buffer capacity {capacity} cannot hold windows totalling {required}")]
    CapacityTooSmall { capacity: usize, required: usize },
}

/// Result type for analytics operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
