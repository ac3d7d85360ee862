//! Trend and burst analytics over word frequency snapshots
//!
//! - [`buffer`] - bounded, time-ordered snapshot storage
//! - [`trend`] - new/lost/common classification between two snapshots
//! - [`burst`] - current-vs-baseline window scoring
//! - [`facade`] - per-metric locked buffers and the read paths built on them

pub mod buffer;
pub mod burst;
pub mod error;
pub mod facade;
pub mod trend;

pub use buffer::{SnapshotBuffer, SnapshotEntry, DEFAULT_MAX_LENGTH};
pub use burst::{BurstDetector, BurstParams, BurstParamsBuilder, EPSILON};
pub use error::{AnalysisError, AnalysisResult};
pub use facade::{AnalysisFacade, MetricReport, REPORT_TOP_WORDS};
pub use trend::{mean_snapshot, TrendComparator, TrendReport};
