//! Facade pipeline tests
//!
//! Snapshots go in through `AnalysisFacade::ingest*` and come back out as
//! trend reports, burst rankings and rendered reports.

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

use wordpulse::analytics::{AnalysisFacade, BurstParams};
use wordpulse::models::{AnalysisOutcome, MetricKind, TrendClass};
use wordpulse::provider::FileSnapshotProvider;
use wordpulse::report;

use super::fixtures::{write_fixture, CONTENT_CSV_ROUND_1, CONTENT_CSV_ROUND_2, TITLE_CSV};
use crate::common::{snapshot, super_topic_history};

#[tokio::test]
async fn test_csv_rounds_classified() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_fixture(temp_dir.path(), "round1.csv", CONTENT_CSV_ROUND_1);
    let second = write_fixture(temp_dir.path(), "round2.csv", CONTENT_CSV_ROUND_2);

    let facade = AnalysisFacade::shared_default();
    for path in [&first, &second] {
        let snapshot = FileSnapshotProvider::read_file(path).await.unwrap();
        facade.ingest(MetricKind::Content, snapshot).await;
    }

    let trend = facade
        .short_horizon_trend(MetricKind::Content)
        .await
        .into_ready()
        .unwrap();

    let words = |class| -> Vec<String> {
        trend
            .by_class(class)
            .map(|row| row.word.clone())
            .collect()
    };
    assert_eq!(words(TrendClass::New), vec!["durian"]);
    assert_eq!(words(TrendClass::Lost), vec!["apple"]);
    assert_eq!(words(TrendClass::Common), vec!["banana", "common_word"]);

    let durian = trend.row("durian").unwrap();
    assert_eq!(durian.change, 15.0);
    assert_eq!(durian.change_rate, 1.0);
}

#[tokio::test]
async fn test_metrics_are_independent() {
    let facade = AnalysisFacade::shared_default();

    let temp_dir = TempDir::new().unwrap();
    let titles = write_fixture(temp_dir.path(), "titles.csv", TITLE_CSV);
    let title_snapshot = FileSnapshotProvider::read_file(&titles).await.unwrap();
    assert_eq!(title_snapshot.count("rates, mortgage"), 7.0);
    assert!(!title_snapshot.contains("broken"));

    facade.ingest(MetricKind::Title, title_snapshot).await;
    facade
        .ingest(MetricKind::Content, snapshot(&[("apple", 1.0)]))
        .await;
    facade
        .ingest(MetricKind::Content, snapshot(&[("apple", 2.0)]))
        .await;

    assert_eq!(facade.status(MetricKind::Content).await.size, 2);
    assert_eq!(facade.status(MetricKind::Title).await.size, 1);
    assert!(facade.short_horizon_trend(MetricKind::Content).await.is_ready());
    assert!(!facade.short_horizon_trend(MetricKind::Title).await.is_ready());
}

#[tokio::test]
async fn test_burst_ranking_over_full_buffer() {
    let facade = AnalysisFacade::shared_default();
    for snapshot in super_topic_history() {
        facade.ingest(MetricKind::Content, snapshot).await;
    }

    let rows = facade
        .burst_ranking_default(MetricKind::Content)
        .await
        .unwrap()
        .into_ready()
        .unwrap();

    assert_eq!(rows[0].word, "SuperTopic");
    assert_eq!(rows[0].freq_now, 100.0);
    assert!((rows[0].freq_base - 2.0).abs() < 1e-9);
    assert!((rows[0].fold_change - 50.0).abs() < 1e-3);
    assert!(rows[0].burst_score > rows[1].burst_score);

    // Title buffer is still empty
    assert_eq!(
        facade.burst_ranking_default(MetricKind::Title).await.unwrap(),
        AnalysisOutcome::InsufficientHistory {
            required: 10,
            available: 0
        }
    );
}

#[tokio::test]
async fn test_burst_ranking_with_custom_params() {
    let facade = AnalysisFacade::shared_default();
    for snapshot in super_topic_history() {
        facade.ingest(MetricKind::Content, snapshot).await;
    }

    let params = BurstParams::builder().top_k(1).build().unwrap();
    let rows = facade
        .burst_ranking(MetricKind::Content, &params)
        .await
        .unwrap()
        .unwrap_or_default();
    assert_eq!(rows.len(), 1);

    let invalid = BurstParams {
        current_window_size: 0,
        ..BurstParams::default()
    };
    assert!(facade
        .burst_ranking(MetricKind::Content, &invalid)
        .await
        .is_err());
}

#[tokio::test]
async fn test_eviction_keeps_newest_entries() {
    let facade = AnalysisFacade::shared_default();
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    for i in 0..13 {
        facade
            .ingest_at(
                MetricKind::Title,
                start + Duration::minutes(i),
                snapshot(&[("round", (i + 1) as f64)]),
            )
            .await;
    }

    let status = facade.status(MetricKind::Title).await;
    assert_eq!(status.size, 10);
    assert!(status.is_full());
    assert_eq!(status.oldest, Some(start + Duration::minutes(3)));
    assert_eq!(status.latest, Some(start + Duration::minutes(12)));

    let entries = facade.entries(MetricKind::Title).await;
    assert_eq!(entries[0].snapshot.count("round"), 4.0);
}

#[tokio::test]
async fn test_baseline_trend_uses_mean_of_history() {
    let facade = AnalysisFacade::shared_default();
    facade
        .ingest(MetricKind::Content, snapshot(&[("steady", 10.0), ("fading", 6.0)]))
        .await;
    facade
        .ingest(MetricKind::Content, snapshot(&[("steady", 20.0)]))
        .await;
    facade
        .ingest(MetricKind::Content, snapshot(&[("steady", 15.0), ("fresh", 1.0)]))
        .await;

    let trend = facade
        .baseline_trend(MetricKind::Content)
        .await
        .into_ready()
        .unwrap();

    let steady = trend.row("steady").unwrap();
    assert_eq!(steady.count_old, 15.0);
    assert_eq!(steady.class, TrendClass::Common);

    // Absent rounds count as zero in the mean
    let fading = trend.row("fading").unwrap();
    assert_eq!(fading.count_old, 3.0);
    assert_eq!(fading.class, TrendClass::Lost);

    assert_eq!(trend.row("fresh").unwrap().class, TrendClass::New);
}

#[tokio::test]
async fn test_concurrent_ingest_and_read() {
    let facade = AnalysisFacade::shared_default();

    let writer = {
        let facade = Arc::clone(&facade);
        tokio::spawn(async move {
            for i in 0..50 {
                facade
                    .ingest(MetricKind::Content, snapshot(&[("w", (i + 1) as f64)]))
                    .await;
            }
        })
    };

    let reader = {
        let facade = Arc::clone(&facade);
        tokio::spawn(async move {
            for _ in 0..50 {
                let report = facade.report(MetricKind::Content).await.unwrap();
                assert!(report.status.size <= report.status.capacity);
                if let Some(trend) = report.short_horizon.ready() {
                    // Consecutive rounds always differ by exactly one
                    assert_eq!(trend.row("w").unwrap().change, 1.0);
                }
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
    assert_eq!(facade.status(MetricKind::Content).await.size, 10);
}

#[tokio::test]
async fn test_rendered_report() {
    let facade = AnalysisFacade::shared_default();
    for snapshot in super_topic_history() {
        facade.ingest(MetricKind::Content, snapshot).await;
    }

    let metric_report = facade.report(MetricKind::Content).await.unwrap();
    let text = report::render_metric_report(&metric_report, report::DEFAULT_TREND_LIMIT);

    assert!(text.contains("content: 10/10 snapshots [full]"));
    assert!(text.contains("SuperTopic"));
    assert!(text.contains("100.00"));
    assert!(!text.contains("Waiting for more data"));

    let json: serde_json::Value =
        serde_json::from_str(&report::to_json(&metric_report).unwrap()).unwrap();
    assert_eq!(json["metric"], "content");
    assert_eq!(json["bursts"]["status"], "ready");
    assert_eq!(json["bursts"]["data"][0]["word"], "SuperTopic");
}
