//! Configuration management for wordpulse
//!
//! This module handles loading and validating configuration from environment variables,
//! TOML files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analytics::{BurstParams, DEFAULT_MAX_LENGTH};
use crate::models::MetricKind;
use crate::scheduler::SchedulerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Buffer and burst detection settings
    pub analysis: AnalysisConfig,

    /// Snapshot sources and refresh cadence
    pub ingest: IngestConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Buffer capacity and burst detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Snapshots retained per metric
    pub max_length: usize,

    /// Snapshots in the current window
    pub current_window_size: usize,

    /// Snapshots in the baseline window
    pub baseline_window_size: usize,

    /// Minimum current-window volume for a burst
    pub min_freq_now: f64,

    /// Minimum normalized baseline volume for a burst
    pub min_freq_base: f64,

    /// Bursts returned per ranking
    pub top_k: usize,
}

/// Snapshot source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Seconds between refresh cycles
    pub interval_secs: u64,

    /// Content word frequency file
    pub content_path: Option<PathBuf>,

    /// Title word frequency file
    pub title_path: Option<PathBuf>,

    /// Skip files whose modification time has not changed
    pub skip_unchanged: bool,

    /// Run the first cycle immediately
    pub run_on_start: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let params = BurstParams::default();
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            current_window_size: params.current_window_size,
            baseline_window_size: params.baseline_window_size,
            min_freq_now: params.min_freq_now,
            min_freq_base: params.min_freq_base,
            top_k: params.top_k,
        }
    }
}

impl AnalysisConfig {
    /// Burst parameters described by this section
    pub fn burst_params(&self) -> BurstParams {
        BurstParams {
            current_window_size: self.current_window_size,
            baseline_window_size: self.baseline_window_size,
            min_freq_now: self.min_freq_now,
            min_freq_base: self.min_freq_base,
            top_k: self.top_k,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            content_path: None,
            title_path: None,
            skip_unchanged: true,
            run_on_start: true,
        }
    }
}

impl IngestConfig {
    /// Get refresh interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Metrics with a configured snapshot file
    pub fn metrics(&self) -> Vec<MetricKind> {
        MetricKind::ALL
            .into_iter()
            .filter(|metric| self.path(*metric).is_some())
            .collect()
    }

    /// Snapshot file for a metric
    pub fn path(&self, metric: MetricKind) -> Option<&Path> {
        match metric {
            MetricKind::Content => self.content_path.as_deref(),
            MetricKind::Title => self.title_path.as_deref(),
        }
    }

    /// Scheduler settings described by this section
    ///
    /// Only metrics with a configured file are fetched; with none configured
    /// every metric is.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        let defaults = SchedulerConfig::default();
        let metrics = self.metrics();
        SchedulerConfig {
            interval: self.interval(),
            run_on_start: self.run_on_start,
            metrics: if metrics.is_empty() { defaults.metrics.clone() } else { metrics },
            ..defaults
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Override values with any `WORDPULSE_*` variables that are set
    pub fn apply_env(&mut self) {
        let analysis = &mut self.analysis;
        if let Some(v) = env_parse("WORDPULSE_MAX_LENGTH") {
            analysis.max_length = v;
        }
        if let Some(v) = env_parse("WORDPULSE_CURRENT_WINDOW_SIZE") {
            analysis.current_window_size = v;
        }
        if let Some(v) = env_parse("WORDPULSE_BASELINE_WINDOW_SIZE") {
            analysis.baseline_window_size = v;
        }
        if let Some(v) = env_parse("WORDPULSE_MIN_FREQ_NOW") {
            analysis.min_freq_now = v;
        }
        if let Some(v) = env_parse("WORDPULSE_MIN_FREQ_BASE") {
            analysis.min_freq_base = v;
        }
        if let Some(v) = env_parse("WORDPULSE_TOP_K") {
            analysis.top_k = v;
        }

        let ingest = &mut self.ingest;
        if let Some(v) = env_parse("WORDPULSE_INTERVAL_SECS") {
            ingest.interval_secs = v;
        }
        if let Ok(path) = std::env::var("WORDPULSE_CONTENT_PATH") {
            ingest.content_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("WORDPULSE_TITLE_PATH") {
            ingest.title_path = Some(PathBuf::from(path));
        }
        if let Some(v) = env_parse("WORDPULSE_SKIP_UNCHANGED") {
            ingest.skip_unchanged = v;
        }

        if let Ok(level) = std::env::var("WORDPULSE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("WORDPULSE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from an optional file, then apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let params = self.analysis.burst_params();
        params.validate().context("Invalid burst parameters")?;

        if self.analysis.max_length == 0 {
            anyhow::bail!("max_length must be greater than 0");
        }

        params
            .validate_capacity(self.analysis.max_length)
            .context("max_length cannot hold both burst windows")?;

        if self.ingest.interval_secs == 0 {
            anyhow::bail!("interval_secs must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            );
        }

        Ok(())
    }
}
