//! wordpulse - Word frequency trend and burst analysis
//!
//! Keeps a bounded history of word frequency snapshots per metric and reports
//! how vocabulary changes between refresh cycles and which words are bursting
//! against their recent history.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`] - Snapshots, metrics and result rows
//! - [`analytics`] - Snapshot buffer, trend comparison, burst detection and the shared facade
//! - [`provider`] - Snapshot sources (CSV/JSON files)
//! - [`scheduler`] - Periodic ingestion loop
//! - [`report`] - Text and JSON rendering
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use wordpulse::analytics::AnalysisFacade;
//! use wordpulse::models::{MetricKind, Snapshot};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let facade = AnalysisFacade::shared_default();
//!     facade
//!         .ingest(MetricKind::Content, Snapshot::from_counts([("rust", 4.0)]))
//!         .await;
//!     let report = facade.report(MetricKind::Content).await?;
//!     println!("{}", wordpulse::report::render_metric_report(&report, 10));
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod report;
pub mod scheduler;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{
        AnalysisFacade, BurstDetector, BurstParams, MetricReport, SnapshotBuffer,
        TrendComparator, TrendReport,
    };
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, PulseErrorTrait, Result};
    pub use crate::models::{
        AnalysisOutcome, BurstRow, MetricKind, Snapshot, TopWord, TrendClass, TrendRow,
    };
    pub use crate::provider::{FileSnapshotProvider, SnapshotProvider};
    pub use crate::scheduler::{IngestHandle, IngestScheduler, SchedulerConfig};
}

// Direct re-exports for convenience
pub use models::{AnalysisOutcome, MetricKind, Snapshot};
