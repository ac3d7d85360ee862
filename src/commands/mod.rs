pub mod analyze;
pub mod config;
pub mod watch;

// Re-export command functions for convenience
pub use analyze::{analyze, AnalyzeParams};
pub use config::show_config;
pub use watch::{watch, WatchParams};

use anyhow::Result;
use wordpulse::analytics::MetricReport;
use wordpulse::report;

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print a metric report in the requested format
pub fn print_report(report: &MetricReport, format: OutputFormat, limit: usize) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", report::render_metric_report(report, limit)),
        OutputFormat::Json => println!("{}", report::to_json(report)?),
    }
    Ok(())
}
