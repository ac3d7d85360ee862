use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordpulse::models::MetricKind;

mod commands;

use commands::{AnalyzeParams, OutputFormat, WatchParams};

#[derive(Parser)]
#[command(
    name = "wordpulse",
    version,
    about = "Word frequency trend classification and burst detection",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll snapshot files and print a report after every refresh cycle
    Watch {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Content word frequency file (CSV or JSON)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Title word frequency file (CSV or JSON)
        #[arg(long)]
        title: Option<PathBuf>,

        /// Seconds between refresh cycles
        #[arg(short, long)]
        interval: Option<u64>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Rows shown per trend table
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Ingest snapshot files in order and print one report
    Analyze {
        /// Metric the files belong to (content, title)
        #[arg(short, long, default_value = "content")]
        metric: MetricKind,

        /// Snapshot files, oldest first
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Rows shown per trend table
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Print the effective configuration
    Config {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    setup_tracing(&cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Watch {
            config,
            content,
            title,
            interval,
            format,
            limit,
        } => {
            tracing::info!(
                config = ?config,
                content = ?content,
                title = ?title,
                interval = ?interval,
                "Starting watch command"
            );
            commands::watch(WatchParams {
                config_path: config,
                content,
                title,
                interval_secs: interval,
                format,
                limit,
            })
            .await?;
        }

        Commands::Analyze {
            metric,
            files,
            config,
            format,
            limit,
        } => {
            tracing::info!(
                metric = %metric,
                files = files.len(),
                "Starting analyze command"
            );
            commands::analyze(AnalyzeParams {
                config_path: config,
                metric,
                files,
                format,
                limit,
            })
            .await?;
        }

        Commands::Config { config } => {
            commands::show_config(config.as_deref())?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("wordpulse=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wordpulse=info,warn"))
    };

    // Reports go to stdout, logs to stderr
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    Ok(())
}
