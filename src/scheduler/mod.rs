//! Background ingestion
//!
//! Drives the periodic refresh cycle that pulls one snapshot per metric from
//! a [`SnapshotProvider`](crate::provider::SnapshotProvider) into the
//! [`AnalysisFacade`](crate::analytics::AnalysisFacade).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wordpulse::scheduler::{IngestScheduler, SchedulerConfig};
//!
//! let scheduler = IngestScheduler::new(SchedulerConfig::default(), facade, provider)?;
//! let handle = scheduler.spawn();
//!
//! // ... later
//! handle.shutdown().await?;
//! ```

pub mod error;
pub mod ingest;

pub use error::{SchedulerError, SchedulerResult};
pub use ingest::{
    CycleSummary, IngestEvent, IngestHandle, IngestScheduler, SchedulerConfig,
    SchedulerConfigBuilder,
};
