//! Snapshot sources
//!
//! The analytics core never performs I/O itself. Each refresh cycle the
//! scheduler asks a [`SnapshotProvider`] for one fresh table per metric.

pub mod error;
pub mod file;

use async_trait::async_trait;

use crate::models::{MetricKind, Snapshot};

pub use error::{ProviderError, ProviderResult};
pub use file::{parse_csv, parse_json, FileSnapshotProvider, SnapshotFormat};

/// Supplies word frequency snapshots on demand
///
/// Implement this trait to feed the scheduler from a new source.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Fetch the current snapshot for a metric
    ///
    /// # Returns
    /// - `Ok(Some(snapshot))` with fresh data
    /// - `Ok(None)` when nothing changed since the previous fetch
    /// - `Err` when the fetch failed; the cycle is skipped for this metric
    async fn fetch(&self, metric: MetricKind) -> ProviderResult<Option<Snapshot>>;
}
