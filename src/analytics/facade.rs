//! Per-metric snapshot buffers and the analyses read from them
//!
//! Each metric's buffer sits behind its own lock, so ingesting title
//! frequencies never waits on a content analysis. Read paths copy the entry
//! list under the read lock and compute outside it, so every analysis sees one
//! consistent state of the buffer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::buffer::{SnapshotBuffer, SnapshotEntry};
use super::burst::{BurstDetector, BurstParams};
use super::error::AnalysisResult;
use super::trend::{mean_snapshot, TrendComparator, TrendReport};
use crate::config::AnalysisConfig;
use crate::models::{AnalysisOutcome, BufferStatus, BurstRow, MetricKind, Snapshot, TopWord};

/// Entries a trend comparison needs
const TREND_MIN_HISTORY: usize = 2;

/// Most frequent words listed per report
pub const REPORT_TOP_WORDS: usize = 10;

/// Every analysis for one metric, computed from the same buffer state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    pub metric: MetricKind,
    pub generated_at: DateTime<Utc>,
    pub status: BufferStatus,
    /// Most frequent words of the latest snapshot
    pub top_words: Vec<TopWord>,
    /// Latest snapshot against the one before it
    pub short_horizon: AnalysisOutcome<TrendReport>,
    /// Latest snapshot against the mean of all older snapshots
    pub baseline: AnalysisOutcome<TrendReport>,
    pub bursts: AnalysisOutcome<Vec<BurstRow>>,
}

/// Shared analysis context
///
/// Wrap in an `Arc` and hand clones to the ingestion task and to readers.
#[derive(Debug)]
pub struct AnalysisFacade {
    content: RwLock<SnapshotBuffer>,
    title: RwLock<SnapshotBuffer>,
    burst_params: BurstParams,
}

impl AnalysisFacade {
    /// Create a facade whose buffers hold `max_length` snapshots each
    ///
    /// `burst_params` are used by [`burst_ranking_default`](Self::burst_ranking_default)
    /// and [`report`](Self::report).
    pub fn new(max_length: usize, burst_params: BurstParams) -> AnalysisResult<Self> {
        burst_params.validate()?;
        burst_params.validate_capacity(max_length.max(1))?;

        Ok(Self {
            content: RwLock::new(SnapshotBuffer::new(max_length)),
            title: RwLock::new(SnapshotBuffer::new(max_length)),
            burst_params,
        })
    }

    /// Create from the analysis section of the configuration
    pub fn from_config(config: &AnalysisConfig) -> AnalysisResult<Self> {
        Self::new(config.max_length, config.burst_params())
    }

    /// Create with default capacity and burst parameters, shared
    #[must_use]
    pub fn shared_default() -> Arc<Self> {
        let params = BurstParams::default();
        Arc::new(Self {
            content: RwLock::new(SnapshotBuffer::with_default_capacity()),
            title: RwLock::new(SnapshotBuffer::with_default_capacity()),
            burst_params: params,
        })
    }

    fn buffer(&self, metric: MetricKind) -> &RwLock<SnapshotBuffer> {
        match metric {
            MetricKind::Content => &self.content,
            MetricKind::Title => &self.title,
        }
    }

    /// Configured burst parameters
    pub fn burst_params(&self) -> &BurstParams {
        &self.burst_params
    }

    /// Store a freshly fetched snapshot
    pub async fn ingest(&self, metric: MetricKind, snapshot: Snapshot) {
        self.ingest_at(metric, Utc::now(), snapshot).await;
    }

    /// Store a snapshot with an explicit timestamp
    pub async fn ingest_at(&self, metric: MetricKind, timestamp: DateTime<Utc>, snapshot: Snapshot) {
        let words = snapshot.len();
        let mut buffer = self.buffer(metric).write().await;
        buffer.add_at(timestamp, snapshot);

        tracing::debug!(
            metric = %metric,
            words,
            size = buffer.size(),
            "Ingested snapshot"
        );
    }

    /// Copy of a metric's entries, oldest first
    pub async fn entries(&self, metric: MetricKind) -> Vec<SnapshotEntry> {
        self.buffer(metric).read().await.get_all()
    }

    /// Most recent snapshot of a metric
    pub async fn latest_snapshot(&self, metric: MetricKind) -> Option<Arc<Snapshot>> {
        let buffer = self.buffer(metric).read().await;
        buffer.get_latest().map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Occupancy of a metric's buffer
    pub async fn status(&self, metric: MetricKind) -> BufferStatus {
        let buffer = self.buffer(metric).read().await;
        Self::status_of(metric, &buffer)
    }

    fn status_of(metric: MetricKind, buffer: &SnapshotBuffer) -> BufferStatus {
        BufferStatus {
            metric,
            size: buffer.size(),
            capacity: buffer.capacity(),
            oldest: buffer.get_oldest().map(|e| e.timestamp),
            latest: buffer.get_latest().map(|e| e.timestamp),
        }
    }

    /// Compare the two most recent snapshots
    pub async fn short_horizon_trend(&self, metric: MetricKind) -> AnalysisOutcome<TrendReport> {
        let recent = self.buffer(metric).read().await.get_recent(TREND_MIN_HISTORY);
        Self::short_horizon_of(&recent)
    }

    /// Compare the latest snapshot to the mean of every older retained snapshot
    pub async fn baseline_trend(&self, metric: MetricKind) -> AnalysisOutcome<TrendReport> {
        let entries = self.entries(metric).await;
        Self::baseline_of(&entries)
    }

    /// Rank bursting words with explicit parameters
    pub async fn burst_ranking(
        &self,
        metric: MetricKind,
        params: &BurstParams,
    ) -> AnalysisResult<AnalysisOutcome<Vec<BurstRow>>> {
        let entries = self.entries(metric).await;
        BurstDetector::detect_entries(&entries, params)
    }

    /// Rank bursting words with the configured parameters
    pub async fn burst_ranking_default(
        &self,
        metric: MetricKind,
    ) -> AnalysisResult<AnalysisOutcome<Vec<BurstRow>>> {
        self.burst_ranking(metric, &self.burst_params).await
    }

    /// Run every analysis for a metric against one copy of its buffer
    pub async fn report(&self, metric: MetricKind) -> AnalysisResult<MetricReport> {
        let (entries, status) = {
            let buffer = self.buffer(metric).read().await;
            (buffer.get_all(), Self::status_of(metric, &buffer))
        };

        let tail = entries.len().saturating_sub(TREND_MIN_HISTORY);

        Ok(MetricReport {
            metric,
            generated_at: Utc::now(),
            status,
            top_words: entries
                .last()
                .map(|entry| entry.snapshot.top_words(REPORT_TOP_WORDS))
                .unwrap_or_default(),
            short_horizon: Self::short_horizon_of(&entries[tail..]),
            baseline: Self::baseline_of(&entries),
            bursts: BurstDetector::detect_entries(&entries, &self.burst_params)?,
        })
    }

    fn short_horizon_of(recent: &[SnapshotEntry]) -> AnalysisOutcome<TrendReport> {
        match recent {
            [.., previous, latest] => AnalysisOutcome::Ready(TrendComparator::compare(
                Some(previous.snapshot.as_ref()),
                Some(latest.snapshot.as_ref()),
            )),
            _ => AnalysisOutcome::InsufficientHistory {
                required: TREND_MIN_HISTORY,
                available: recent.len(),
            },
        }
    }

    fn baseline_of(entries: &[SnapshotEntry]) -> AnalysisOutcome<TrendReport> {
        let Some((latest, older)) = entries.split_last().filter(|(_, older)| !older.is_empty())
        else {
            return AnalysisOutcome::InsufficientHistory {
                required: TREND_MIN_HISTORY,
                available: entries.len(),
            };
        };

        let baseline = mean_snapshot(older.iter().map(|entry| entry.snapshot.as_ref()));
        AnalysisOutcome::Ready(TrendComparator::compare(
            Some(&baseline),
            Some(latest.snapshot.as_ref()),
        ))
    }
}
