//! File-backed snapshot provider
//!
//! Reads one file per metric. `.json` files hold an object of word to count;
//! anything else is read as CSV with a header naming a `word` column and a
//! `frequency` (or `count`) column. Rows whose count is missing or not
//! numeric are dropped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::Mutex;

use super::error::{ProviderError, ProviderResult};
use super::SnapshotProvider;
use crate::models::{MetricKind, Snapshot};

/// Accepted names for the count column, in order of preference
const COUNT_COLUMNS: [&str; 2] = ["frequency", "count"];

/// On-disk snapshot layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    Csv,
    Json,
}

impl SnapshotFormat {
    /// Pick the format from a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Reads snapshots from local files
#[derive(Debug)]
pub struct FileSnapshotProvider {
    paths: HashMap<MetricKind, PathBuf>,
    skip_unchanged: bool,
    last_modified: Mutex<HashMap<MetricKind, SystemTime>>,
}

impl FileSnapshotProvider {
    /// Create a provider with no sources
    #[must_use]
    pub fn new() -> Self {
        Self {
            paths: HashMap::new(),
            skip_unchanged: false,
            last_modified: Mutex::new(HashMap::new()),
        }
    }

    /// Set the file for a metric
    #[must_use]
    pub fn with_path(mut self, metric: MetricKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(metric, path.into());
        self
    }

    /// Report `None` for files whose modification time has not changed
    #[must_use]
    pub fn with_skip_unchanged(mut self, skip: bool) -> Self {
        self.skip_unchanged = skip;
        self
    }

    /// Configured file for a metric
    pub fn path(&self, metric: MetricKind) -> Option<&Path> {
        self.paths.get(&metric).map(PathBuf::as_path)
    }

    /// Read and parse a snapshot file
    pub async fn read_file(path: &Path) -> ProviderResult<Snapshot> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ProviderError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        match SnapshotFormat::from_path(path) {
            SnapshotFormat::Json => parse_json(&text).map_err(|reason| ProviderError::Parse {
                path: path.to_path_buf(),
                reason,
            }),
            SnapshotFormat::Csv => parse_csv(&text).map_err(|err| match err {
                CsvError::MissingColumn(column) => ProviderError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                },
                CsvError::Empty => ProviderError::Parse {
                    path: path.to_path_buf(),
                    reason: "file has no header".to_string(),
                },
            }),
        }
    }

    async fn modified(path: &Path) -> ProviderResult<SystemTime> {
        tokio::fs::metadata(path)
            .await
            .and_then(|meta| meta.modified())
            .map_err(|source| ProviderError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Default for FileSnapshotProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotProvider for FileSnapshotProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, metric: MetricKind) -> ProviderResult<Option<Snapshot>> {
        let path = self
            .paths
            .get(&metric)
            .ok_or(ProviderError::NotConfigured(metric))?;

        if !self.skip_unchanged {
            return Self::read_file(path).await.map(Some);
        }

        let modified = Self::modified(path).await?;
        if self.last_modified.lock().await.get(&metric) == Some(&modified) {
            tracing::debug!(metric = %metric, path = %path.display(), "Snapshot file unchanged");
            return Ok(None);
        }

        let snapshot = Self::read_file(path).await?;
        self.last_modified.lock().await.insert(metric, modified);
        Ok(Some(snapshot))
    }
}

/// CSV parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    /// No header line
    Empty,
    /// Header lacks a required column
    MissingColumn(String),
}

/// Parse a `word,frequency` CSV table
pub fn parse_csv(text: &str) -> Result<Snapshot, CsvError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = split_csv_line(lines.next().ok_or(CsvError::Empty)?);
    let column = |name: &str| {
        header
            .iter()
            .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
    };

    let word_idx = column("word").ok_or_else(|| CsvError::MissingColumn("word".to_string()))?;
    let count_idx = COUNT_COLUMNS
        .iter()
        .find_map(|&name| column(name))
        .ok_or_else(|| CsvError::MissingColumn(COUNT_COLUMNS[0].to_string()))?;

    let mut skipped = 0usize;
    let mut rows = Vec::new();

    for line in lines {
        let fields = split_csv_line(line);
        // Words are kept as written; blank ones are skipped
        let word = fields.get(word_idx).filter(|w| !w.trim().is_empty());
        let count = fields
            .get(count_idx)
            .and_then(|c| c.trim().parse::<f64>().ok());

        match (word, count) {
            (Some(word), Some(count)) => rows.push((word.clone(), count)),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Skipped CSV rows without a word or numeric frequency");
    }

    Ok(Snapshot::from_counts(rows))
}

/// Parse a JSON object of word to count
///
/// Non-numeric values are dropped.
pub fn parse_json(text: &str) -> Result<Snapshot, String> {
    let table: HashMap<String, serde_json::Value> =
        serde_json::from_str(text).map_err(|e| e.to_string())?;

    let total = table.len();
    let rows: Vec<(String, f64)> = table
        .into_iter()
        .filter_map(|(word, value)| value.as_f64().map(|count| (word, count)))
        .collect();

    if rows.len() < total {
        tracing::warn!(
            skipped = total - rows.len(),
            "Skipped JSON entries with non-numeric counts"
        );
    }

    Ok(Snapshot::from_counts(rows))
}

/// Split one CSV line, honoring double-quoted fields
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(ch),
        }
    }
    fields.push(field);
    fields
}
