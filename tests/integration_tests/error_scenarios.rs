//! Error handling and recovery scenarios

use std::sync::Arc;
use tempfile::TempDir;

use wordpulse::analytics::{AnalysisError, AnalysisFacade, BurstParams};
use wordpulse::error::{Error, ErrorCategory, PulseErrorTrait};
use wordpulse::models::MetricKind;
use wordpulse::provider::{FileSnapshotProvider, ProviderError, SnapshotProvider};
use wordpulse::scheduler::{IngestEvent, IngestScheduler, SchedulerConfig};

use super::fixtures::write_fixture;

#[tokio::test]
async fn test_missing_column_is_not_recoverable() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(temp_dir.path(), "bad.csv", "token,score\nalpha,1\n");

    let provider = FileSnapshotProvider::new().with_path(MetricKind::Content, &path);
    let err = provider.fetch(MetricKind::Content).await.unwrap_err();

    assert!(matches!(err, ProviderError::MissingColumn { ref column, .. } if column == "word"));

    let unified: Error = err.into();
    assert!(!unified.is_recoverable());
    assert_eq!(unified.category(), ErrorCategory::Ingestion);
}

#[tokio::test]
async fn test_malformed_json_reported_as_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(temp_dir.path(), "titles.json", "{not json");

    let err = FileSnapshotProvider::read_file(&path).await.unwrap_err();
    assert!(matches!(err, ProviderError::Parse { .. }));
}

#[tokio::test]
async fn test_deleted_file_fails_cycle_but_not_loop() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(temp_dir.path(), "words.csv", "word,frequency\nalpha,4\n");

    let provider = FileSnapshotProvider::new().with_path(MetricKind::Content, &path);
    let config = SchedulerConfig::builder()
        .metrics([MetricKind::Content])
        .build()
        .unwrap();
    let facade = AnalysisFacade::shared_default();
    let scheduler = IngestScheduler::new(config, Arc::clone(&facade), Arc::new(provider)).unwrap();
    let mut events = scheduler.subscribe();

    scheduler.run_once().await;
    std::fs::remove_file(&path).unwrap();
    let summary = scheduler.run_once().await;

    assert_eq!(summary.failed, vec![MetricKind::Content]);
    assert_eq!(facade.status(MetricKind::Content).await.size, 1);

    let mut saw_failure = false;
    while let Ok(event) = events.try_recv() {
        if let IngestEvent::FetchFailed { metric, cycle, .. } = event {
            assert_eq!(metric, MetricKind::Content);
            assert_eq!(cycle, 2);
            saw_failure = true;
        }
    }
    assert!(saw_failure);
}

#[test]
fn test_facade_rejects_small_capacity() {
    let err = AnalysisFacade::new(5, BurstParams::default()).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::CapacityTooSmall {
            capacity: 5,
            required: 10
        }
    );

    let unified: Error = err.into();
    assert_eq!(unified.category(), ErrorCategory::Config);
}

#[test]
fn test_invalid_thresholds_rejected() {
    assert!(BurstParams::builder().min_freq_now(f64::NAN).build().is_err());
    assert!(BurstParams::builder().min_freq_base(-1.0).build().is_err());
    assert!(BurstParams::builder().baseline_window_size(0).build().is_err());
}

#[test]
fn test_zero_interval_scheduler_rejected() {
    let err = SchedulerConfig::builder()
        .interval(std::time::Duration::ZERO)
        .build()
        .unwrap_err();

    let unified: Error = err.into();
    assert_eq!(unified.category(), ErrorCategory::Config);
    assert!(!unified.is_recoverable());
}
