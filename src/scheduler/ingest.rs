//! Periodic snapshot ingestion
//!
//! A background task wakes on a fixed interval, asks the provider for one
//! snapshot per metric and ingests whatever arrived. A failed fetch only skips
//! that metric for the cycle. Shutdown is observed between cycles, so a cycle
//! that has started always finishes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};

use super::error::{SchedulerError, SchedulerResult};
use crate::analytics::AnalysisFacade;
use crate::error::PulseErrorTrait;
use crate::models::MetricKind;
use crate::provider::SnapshotProvider;

// ============================================================================
// Scheduler Configuration
// ============================================================================

/// Configuration for the ingestion scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Time between refresh cycles
    pub interval: Duration,

    /// Run a cycle immediately instead of waiting one interval
    pub run_on_start: bool,

    /// Buffered events per subscriber before lagging
    pub event_capacity: usize,

    /// Metrics fetched each cycle
    pub metrics: Vec<MetricKind>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            run_on_start: true,
            event_capacity: 64,
            metrics: MetricKind::ALL.to_vec(),
        }
    }
}

impl SchedulerConfig {
    /// Create a new config builder
    pub fn builder() -> SchedulerConfigBuilder {
        SchedulerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.interval.is_zero() {
            return Err(SchedulerError::config(
                "interval",
                "Refresh interval must be greater than zero",
            ));
        }

        if self.event_capacity == 0 {
            return Err(SchedulerError::config(
                "event_capacity",
                "Event capacity must be greater than zero",
            ));
        }

        if self.metrics.is_empty() {
            return Err(SchedulerError::config(
                "metrics",
                "At least one metric must be fetched",
            ));
        }

        Ok(())
    }
}

/// Builder for SchedulerConfig
#[derive(Debug, Default)]
pub struct SchedulerConfigBuilder {
    interval: Option<Duration>,
    run_on_start: Option<bool>,
    event_capacity: Option<usize>,
    metrics: Option<Vec<MetricKind>>,
}

impl SchedulerConfigBuilder {
    /// Set refresh interval
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Set run on start
    pub fn run_on_start(mut self, value: bool) -> Self {
        self.run_on_start = Some(value);
        self
    }

    /// Set event channel capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Set the metrics fetched each cycle
    pub fn metrics(mut self, metrics: impl IntoIterator<Item = MetricKind>) -> Self {
        self.metrics = Some(metrics.into_iter().collect());
        self
    }

    /// Build the config
    pub fn build(self) -> SchedulerResult<SchedulerConfig> {
        let defaults = SchedulerConfig::default();
        let config = SchedulerConfig {
            interval: self.interval.unwrap_or(defaults.interval),
            run_on_start: self.run_on_start.unwrap_or(defaults.run_on_start),
            event_capacity: self.event_capacity.unwrap_or(defaults.event_capacity),
            metrics: self.metrics.unwrap_or(defaults.metrics),
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Ingest Events
// ============================================================================

/// Outcome of one refresh cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    /// 1-based cycle number
    pub cycle: u64,

    /// Metrics that received a new snapshot
    pub ingested: Vec<MetricKind>,

    /// Metrics whose provider reported no new data
    pub skipped: Vec<MetricKind>,

    /// Metrics whose fetch failed
    pub failed: Vec<MetricKind>,

    pub completed_at: DateTime<Utc>,
}

impl CycleSummary {
    /// Check if every metric received new data
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Events emitted by the ingestion scheduler
#[derive(Debug, Clone)]
pub enum IngestEvent {
    /// A fetch failed; the metric was left untouched this cycle
    FetchFailed {
        cycle: u64,
        metric: MetricKind,
        error: String,
    },

    /// A cycle finished and its snapshots are visible to readers
    CycleCompleted(CycleSummary),

    /// The loop exited after a shutdown request
    Stopped { cycles: u64 },
}

// ============================================================================
// Ingest Scheduler
// ============================================================================

/// Pulls snapshots from a provider into the analysis facade
pub struct IngestScheduler {
    config: SchedulerConfig,
    facade: Arc<AnalysisFacade>,
    provider: Arc<dyn SnapshotProvider>,
    event_sender: broadcast::Sender<IngestEvent>,
    cycles: AtomicU64,
}

impl IngestScheduler {
    /// Create a new scheduler
    pub fn new(
        config: SchedulerConfig,
        facade: Arc<AnalysisFacade>,
        provider: Arc<dyn SnapshotProvider>,
    ) -> SchedulerResult<Self> {
        config.validate()?;

        let (event_sender, _) = broadcast::channel(config.event_capacity);

        Ok(Self {
            config,
            facade,
            provider,
            event_sender,
            cycles: AtomicU64::new(0),
        })
    }

    /// Create with default config
    pub fn with_defaults(
        facade: Arc<AnalysisFacade>,
        provider: Arc<dyn SnapshotProvider>,
    ) -> SchedulerResult<Self> {
        Self::new(SchedulerConfig::default(), facade, provider)
    }

    /// Subscribe to ingestion events
    pub fn subscribe(&self) -> broadcast::Receiver<IngestEvent> {
        self.event_sender.subscribe()
    }

    /// The facade snapshots are ingested into
    pub fn facade(&self) -> &Arc<AnalysisFacade> {
        &self.facade
    }

    /// Number of cycles run so far
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Run a single refresh cycle
    pub async fn run_once(&self) -> CycleSummary {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;

        let mut ingested = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();

        for &metric in &self.config.metrics {
            match self.provider.fetch(metric).await {
                Ok(Some(snapshot)) => {
                    self.facade.ingest(metric, snapshot).await;
                    ingested.push(metric);
                }
                Ok(None) => {
                    tracing::debug!(cycle, metric = %metric, "No new snapshot");
                    skipped.push(metric);
                }
                Err(e) => {
                    tracing::warn!(
                        cycle,
                        metric = %metric,
                        provider = self.provider.name(),
                        recoverable = e.is_recoverable(),
                        category = %PulseErrorTrait::category(&e),
                        "Snapshot fetch failed, skipping metric this cycle: {}",
                        e
                    );
                    let _ = self.event_sender.send(IngestEvent::FetchFailed {
                        cycle,
                        metric,
                        error: e.to_string(),
                    });
                    failed.push(metric);
                }
            }
        }

        let summary = CycleSummary {
            cycle,
            ingested,
            skipped,
            failed,
            completed_at: Utc::now(),
        };

        tracing::info!(
            cycle,
            ingested = summary.ingested.len(),
            skipped = summary.skipped.len(),
            failed = summary.failed.len(),
            "Refresh cycle completed"
        );

        let _ = self
            .event_sender
            .send(IngestEvent::CycleCompleted(summary.clone()));

        summary
    }

    /// Start the ingestion loop on the tokio runtime
    pub fn spawn(self) -> IngestHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let scheduler = Arc::new(self);
        let task_scheduler = Arc::clone(&scheduler);

        let handle = tokio::spawn(async move {
            task_scheduler.run(shutdown_rx).await;
        });

        IngestHandle {
            handle,
            shutdown,
            scheduler,
        }
    }

    async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        if !self.config.run_on_start {
            // The first tick completes immediately
            ticker.tick().await;
        }

        tracing::info!(
            interval_ms = u64::try_from(self.config.interval.as_millis()).unwrap_or(u64::MAX),
            provider = self.provider.name(),
            "Ingestion scheduler started"
        );

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                biased;
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }

        let cycles = self.cycles();
        tracing::info!(cycles, "Ingestion scheduler stopped");
        let _ = self.event_sender.send(IngestEvent::Stopped { cycles });
    }
}

// ============================================================================
// Ingest Handle
// ============================================================================

/// Handle to the running ingestion loop
pub struct IngestHandle {
    handle: tokio::task::JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    scheduler: Arc<IngestScheduler>,
}

impl IngestHandle {
    /// Subscribe to ingestion events
    pub fn subscribe(&self) -> broadcast::Receiver<IngestEvent> {
        self.scheduler.subscribe()
    }

    /// The facade snapshots are ingested into
    pub fn facade(&self) -> &Arc<AnalysisFacade> {
        self.scheduler.facade()
    }

    /// Number of cycles run so far
    pub fn cycles(&self) -> u64 {
        self.scheduler.cycles()
    }

    /// Request a stop without waiting
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Check if the loop is still running
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Wait for the loop to exit
    pub async fn wait(self) -> SchedulerResult<()> {
        self.handle.await?;
        Ok(())
    }

    /// Request a stop and wait for the current cycle to finish
    pub async fn shutdown(self) -> SchedulerResult<()> {
        self.stop();
        self.wait().await
    }
}

// ============================================================================
// Tests
// ============================================================================
