use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use wordpulse::analytics::AnalysisFacade;
use wordpulse::config::Config;
use wordpulse::provider::FileSnapshotProvider;
use wordpulse::scheduler::{IngestEvent, IngestScheduler};

use super::{print_report, OutputFormat};

/// Parameters for the watch command
pub struct WatchParams {
    pub config_path: Option<PathBuf>,
    pub content: Option<PathBuf>,
    pub title: Option<PathBuf>,
    pub interval_secs: Option<u64>,
    pub format: OutputFormat,
    pub limit: usize,
}

/// Poll snapshot files on an interval and print a report after every cycle
///
/// Runs until Ctrl-C; the cycle in progress finishes before exit.
pub async fn watch(params: WatchParams) -> Result<()> {
    let mut config = Config::load(params.config_path.as_deref())?;

    // CLI flags override file and environment values
    if let Some(path) = params.content {
        config.ingest.content_path = Some(path);
    }
    if let Some(path) = params.title {
        config.ingest.title_path = Some(path);
    }
    if let Some(secs) = params.interval_secs {
        config.ingest.interval_secs = secs;
    }
    config.validate()?;

    let metrics = config.ingest.metrics();
    if metrics.is_empty() {
        anyhow::bail!("No snapshot files configured. Pass --content and/or --title");
    }

    let provider = metrics.iter().fold(
        FileSnapshotProvider::new().with_skip_unchanged(config.ingest.skip_unchanged),
        |provider, &metric| match config.ingest.path(metric) {
            Some(path) => provider.with_path(metric, path),
            None => provider,
        },
    );

    let facade = Arc::new(
        AnalysisFacade::from_config(&config.analysis)
            .context("Invalid analysis configuration")?,
    );
    let scheduler = IngestScheduler::new(
        config.ingest.scheduler_config(),
        Arc::clone(&facade),
        Arc::new(provider),
    )?;
    let mut events = scheduler.subscribe();
    let handle = scheduler.spawn();

    println!(
        "Watching {} metric(s) every {}s. Press Ctrl-C to stop.",
        metrics.len(),
        config.ingest.interval_secs
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Received Ctrl-C, stopping");
                break;
            }
            event = events.recv() => match event {
                Ok(IngestEvent::CycleCompleted(summary)) => {
                    for metric in &metrics {
                        let report = facade.report(*metric).await?;
                        print_report(&report, params.format, params.limit)?;
                    }
                    if !summary.failed.is_empty() {
                        println!("Fetch failed this cycle for: {:?}", summary.failed);
                    }
                }
                Ok(IngestEvent::FetchFailed { .. }) => {}
                Ok(IngestEvent::Stopped { .. }) | Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Report renderer fell behind, skipping events");
                }
            }
        }
    }

    let cycles = handle.cycles();
    handle.shutdown().await?;
    println!("Stopped after {cycles} cycle(s)");

    Ok(())
}
