use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use std::path::PathBuf;

use wordpulse::analytics::AnalysisFacade;
use wordpulse::config::Config;
use wordpulse::models::MetricKind;
use wordpulse::provider::FileSnapshotProvider;

use super::{print_report, OutputFormat};

/// Parameters for a one-shot analysis
pub struct AnalyzeParams {
    pub config_path: Option<PathBuf>,
    pub metric: MetricKind,
    pub files: Vec<PathBuf>,
    pub format: OutputFormat,
    pub limit: usize,
}

/// Ingest snapshot files in order and print the resulting report once
///
/// Each file is stamped one refresh interval after the previous one, ending
/// at the current time.
pub async fn analyze(params: AnalyzeParams) -> Result<()> {
    if params.files.is_empty() {
        anyhow::bail!("At least one snapshot file is required");
    }

    let config = Config::load(params.config_path.as_deref())?;
    let facade = AnalysisFacade::from_config(&config.analysis)
        .context("Invalid analysis configuration")?;

    let step = ChronoDuration::seconds(i64::try_from(config.ingest.interval_secs).unwrap_or(60));
    let steps_back = i32::try_from(params.files.len() - 1).unwrap_or(i32::MAX);
    let start = Utc::now() - step * steps_back;

    for (i, path) in params.files.iter().enumerate() {
        let snapshot = FileSnapshotProvider::read_file(path)
            .await
            .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            words = snapshot.len(),
            "Loaded snapshot file"
        );

        let offset = i32::try_from(i).unwrap_or(i32::MAX);
        facade
            .ingest_at(params.metric, start + step * offset, snapshot)
            .await;
    }

    let report = facade.report(params.metric).await?;
    print_report(&report, params.format, params.limit)?;

    tracing::info!(
        metric = %params.metric,
        files = params.files.len(),
        retained = report.status.size,
        "Analysis completed"
    );

    Ok(())
}
