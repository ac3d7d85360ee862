//! Ingestion scheduler tests
//!
//! Drives `IngestScheduler` against real files and scripted providers.

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use wordpulse::analytics::AnalysisFacade;
use wordpulse::models::MetricKind;
use wordpulse::provider::FileSnapshotProvider;
use wordpulse::scheduler::{IngestEvent, IngestScheduler, SchedulerConfig};

use super::fixtures::{write_fixture, CONTENT_CSV_ROUND_1, CONTENT_CSV_ROUND_2, TITLE_JSON};
use crate::common::{snapshot, ScriptedProvider};

#[tokio::test]
async fn test_file_provider_cycles() {
    let temp_dir = TempDir::new().unwrap();
    let content = write_fixture(temp_dir.path(), "word_frequency.csv", CONTENT_CSV_ROUND_1);
    let title = write_fixture(temp_dir.path(), "title_frequency.json", TITLE_JSON);

    let provider = FileSnapshotProvider::new()
        .with_path(MetricKind::Content, &content)
        .with_path(MetricKind::Title, &title);
    let facade = AnalysisFacade::shared_default();
    let scheduler =
        IngestScheduler::with_defaults(Arc::clone(&facade), Arc::new(provider)).unwrap();

    let summary = scheduler.run_once().await;
    assert!(summary.is_complete());
    assert_eq!(summary.ingested, MetricKind::ALL.to_vec());

    // Exporter rewrites the content file between cycles
    std::fs::write(&content, CONTENT_CSV_ROUND_2).unwrap();
    scheduler.run_once().await;

    let trend = facade
        .short_horizon_trend(MetricKind::Content)
        .await
        .into_ready()
        .unwrap();
    assert_eq!(trend.new_words().len(), 1);
    assert_eq!(trend.lost_words().len(), 1);

    let latest_title = facade.latest_snapshot(MetricKind::Title).await.unwrap();
    assert_eq!(latest_title.count("weather"), 3.5);
}

#[tokio::test]
async fn test_unchanged_files_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let content = write_fixture(temp_dir.path(), "word_frequency.csv", CONTENT_CSV_ROUND_1);

    let provider = FileSnapshotProvider::new()
        .with_path(MetricKind::Content, &content)
        .with_skip_unchanged(true);
    let config = SchedulerConfig::builder()
        .metrics([MetricKind::Content])
        .build()
        .unwrap();
    let facade = AnalysisFacade::shared_default();
    let scheduler = IngestScheduler::new(config, Arc::clone(&facade), Arc::new(provider)).unwrap();

    assert_eq!(scheduler.run_once().await.ingested, vec![MetricKind::Content]);
    assert_eq!(scheduler.run_once().await.skipped, vec![MetricKind::Content]);
    assert_eq!(facade.status(MetricKind::Content).await.size, 1);
}

#[tokio::test]
async fn test_failed_fetch_leaves_buffer_unchanged() {
    let provider = Arc::new(ScriptedProvider::new());
    provider
        .push(MetricKind::Content, Ok(Some(snapshot(&[("alpha", 3.0)]))))
        .await;
    provider
        .push(MetricKind::Content, Err(wordpulse::provider::ProviderError::Other("timeout".into())))
        .await;
    provider
        .push(MetricKind::Content, Ok(Some(snapshot(&[("alpha", 5.0)]))))
        .await;

    let config = SchedulerConfig::builder()
        .metrics([MetricKind::Content])
        .build()
        .unwrap();
    let facade = AnalysisFacade::shared_default();
    let scheduler = IngestScheduler::new(config, Arc::clone(&facade), provider).unwrap();

    scheduler.run_once().await;
    let before = facade.entries(MetricKind::Content).await;

    let failed = scheduler.run_once().await;
    assert_eq!(failed.failed, vec![MetricKind::Content]);
    assert_eq!(facade.entries(MetricKind::Content).await, before);

    // The next cycle recovers
    let recovered = scheduler.run_once().await;
    assert_eq!(recovered.cycle, 3);
    assert!(recovered.is_complete());
    assert_eq!(facade.status(MetricKind::Content).await.size, 2);
}

#[tokio::test]
async fn test_background_loop_publishes_cycles() {
    let provider = Arc::new(ScriptedProvider::new());
    for i in 1..=3 {
        provider
            .push(MetricKind::Title, Ok(Some(snapshot(&[("headline", f64::from(i))]))))
            .await;
    }

    let config = SchedulerConfig::builder()
        .interval(Duration::from_millis(20))
        .metrics([MetricKind::Title])
        .build()
        .unwrap();
    let facade = AnalysisFacade::shared_default();
    let scheduler = IngestScheduler::new(config, Arc::clone(&facade), provider).unwrap();
    let mut events = scheduler.subscribe();
    let handle = scheduler.spawn();

    let mut completed = Vec::new();
    while completed.len() < 3 {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("no event within timeout")
            .unwrap();
        if let IngestEvent::CycleCompleted(summary) = event {
            completed.push(summary);
        }
    }

    handle.shutdown().await.unwrap();

    assert_eq!(completed[0].cycle, 1);
    assert_eq!(completed[2].cycle, 3);
    assert!(completed.iter().all(|summary| summary.is_complete()));

    let trend = facade
        .short_horizon_trend(MetricKind::Title)
        .await
        .into_ready()
        .unwrap();
    assert_eq!(trend.row("headline").unwrap().count_new, 3.0);
}
