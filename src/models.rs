// Core data structures for wordpulse

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One refresh cycle's word frequency table
///
/// Counts are finite and strictly positive. Words are case-sensitive and kept
/// in lexicographic order so that joins and renders are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    counts: BTreeMap<String, f64>,
}

impl Snapshot {
    /// Create an empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `(word, count)` pairs
    ///
    /// Repeated words are summed. Counts that are not finite or not positive
    /// are dropped, the same way unusable rows are dropped at load time.
    pub fn from_counts<I, W>(counts: I) -> Self
    where
        I: IntoIterator<Item = (W, f64)>,
        W: Into<String>,
    {
        let mut table = BTreeMap::new();
        let mut dropped = 0usize;

        for (word, count) in counts {
            if !count.is_finite() || count <= 0.0 {
                dropped += 1;
                continue;
            }
            *table.entry(word.into()).or_insert(0.0) += count;
        }

        if dropped > 0 {
            tracing::debug!(dropped, "Dropped non-positive or non-finite counts");
        }

        Self { counts: table }
    }

    /// Count for a word, `None` if the word is absent
    pub fn get(&self, word: &str) -> Option<f64> {
        self.counts.get(word).copied()
    }

    /// Count for a word, 0 if absent
    pub fn count(&self, word: &str) -> f64 {
        self.get(word).unwrap_or(0.0)
    }

    /// Whether the word was observed
    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no words were observed
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }

    /// Iterate `(word, count)` in word order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.counts.iter().map(|(w, &c)| (w.as_str(), c))
    }

    /// Iterate words in order
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.counts.keys().map(String::as_str)
    }

    /// The `n` most frequent words, highest count first
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    /// The `n` most frequent words with their share of the snapshot total
    pub fn top_words(&self, n: usize) -> Vec<TopWord> {
        let total = self.total();
        self.top(n)
            .into_iter()
            .map(|(word, count)| TopWord {
                word: word.to_string(),
                count,
                share: if total > 0.0 { count / total } else { 0.0 },
            })
            .collect()
    }
}

impl<W: Into<String>> FromIterator<(W, f64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (W, f64)>>(iter: I) -> Self {
        Self::from_counts(iter)
    }
}

/// Tracked word frequency streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Word frequency over article bodies
    Content,
    /// Word frequency over article titles
    Title,
}

impl MetricKind {
    /// All tracked metrics
    pub const ALL: [MetricKind; 2] = [MetricKind::Content, MetricKind::Title];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "content" => Ok(Self::Content),
            "title" => Ok(Self::Title),
            other => Err(format!("Unknown metric '{other}'. Valid options: content, title")),
        }
    }
}

/// Presence pattern of a word across two compared snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendClass {
    /// Absent in the old snapshot, present in the new one
    New,
    /// Present in the old snapshot, absent in the new one
    Lost,
    /// Present in both
    Common,
}

impl TrendClass {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Lost => "lost",
            Self::Common => "common",
        }
    }
}

impl fmt::Display for TrendClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One word's change between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRow {
    pub word: String,
    pub count_old: f64,
    pub count_new: f64,
    /// `count_new - count_old`
    pub change: f64,
    /// Relative change; 1.0 for words with no old count
    pub change_rate: f64,
    pub class: TrendClass,
}

/// One of the most frequent words in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopWord {
    pub word: String,
    pub count: f64,
    /// Fraction of the snapshot's total count, in `[0, 1]`
    pub share: f64,
}

/// One word surviving the burst filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstRow {
    pub word: String,
    /// Summed count over the current window
    pub freq_now: f64,
    /// Baseline total scaled to the current window's size
    pub freq_base: f64,
    pub fold_change: f64,
    pub burst_score: f64,
}

/// Result of an analysis that needs a minimum amount of history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum AnalysisOutcome<T> {
    /// Enough history was retained
    Ready(T),

    /// Fewer buffer entries than the analysis requires
    InsufficientHistory { required: usize, available: usize },
}

impl<T> AnalysisOutcome<T> {
    /// Check if a result was produced
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Borrow the result, if any
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::InsufficientHistory { .. } => None,
        }
    }

    /// Take the result, if any
    pub fn into_ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::InsufficientHistory { .. } => None,
        }
    }

    /// Map the ready value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> AnalysisOutcome<U> {
        match self {
            Self::Ready(value) => AnalysisOutcome::Ready(f(value)),
            Self::InsufficientHistory {
                required,
                available,
            } => AnalysisOutcome::InsufficientHistory {
                required,
                available,
            },
        }
    }
}

impl<T: Default> AnalysisOutcome<T> {
    /// Take the result, or the empty value when history is short
    pub fn unwrap_or_default(self) -> T {
        self.into_ready().unwrap_or_default()
    }
}

/// Occupancy of a metric's snapshot buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferStatus {
    pub metric: MetricKind,
    pub size: usize,
    pub capacity: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

impl BufferStatus {
    /// Check if the buffer has reached capacity
    pub fn is_full(&self) -> bool {
        self.size >= self.capacity
    }
}
