//! Trend classification between two frequency snapshots
//!
//! This module provides functionality for:
//! - Reconciling two snapshots as an outer join on word
//! - Classifying each word as new, lost or common
//! - Computing absolute and relative change per word
//! - Building a mean baseline snapshot from older history

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Snapshot, TrendClass, TrendRow};

/// Rate reported for a word with no old count ("100% growth")
pub const NEW_WORD_RATE: f64 = 1.0;

/// Classified rows from comparing two snapshots
///
/// Rows are ordered by word. The class views partition [`TrendReport::all`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    rows: Vec<TrendRow>,
}

impl TrendReport {
    /// Report with no rows, returned when an input snapshot is missing
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every row
    pub fn all(&self) -> &[TrendRow] {
        &self.rows
    }

    /// Rows of one class
    pub fn by_class(&self, class: TrendClass) -> impl Iterator<Item = &TrendRow> + '_ {
        self.rows.iter().filter(move |row| row.class == class)
    }

    /// Words absent in the old snapshot
    pub fn new_words(&self) -> Vec<&TrendRow> {
        self.by_class(TrendClass::New).collect()
    }

    /// Words absent in the new snapshot
    pub fn lost_words(&self) -> Vec<&TrendRow> {
        self.by_class(TrendClass::Lost).collect()
    }

    /// Words present in both snapshots
    pub fn common_words(&self) -> Vec<&TrendRow> {
        self.by_class(TrendClass::Common).collect()
    }

    /// Look up a word's row
    pub fn row(&self, word: &str) -> Option<&TrendRow> {
        self.rows
            .binary_search_by(|row| row.word.as_str().cmp(word))
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count of rows per class as `(new, lost, common)`
    pub fn class_counts(&self) -> (usize, usize, usize) {
        self.rows
            .iter()
            .fold((0, 0, 0), |(n, l, c), row| match row.class {
                TrendClass::New => (n + 1, l, c),
                TrendClass::Lost => (n, l + 1, c),
                TrendClass::Common => (n, l, c + 1),
            })
    }

    /// Rows of an optional class, largest absolute change first
    ///
    /// # Arguments
    /// * `class` - Restrict to one class, or `None` for all rows
    /// * `limit` - Maximum number of rows to return
    #[must_use]
    pub fn top_changes(&self, class: Option<TrendClass>, limit: usize) -> Vec<&TrendRow> {
        let mut rows: Vec<_> = self
            .rows
            .iter()
            .filter(|row| class.map_or(true, |c| row.class == c))
            .collect();

        rows.sort_by(|a, b| {
            b.change
                .abs()
                .total_cmp(&a.change.abs())
                .then_with(|| a.word.cmp(&b.word))
        });
        rows.truncate(limit);
        rows
    }
}

/// Compares two snapshots word by word
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendComparator;

impl TrendComparator {
    /// Reconcile `old` and `new` into classified rows
    ///
    /// Returns [`TrendReport::empty`] when either side is missing.
    #[must_use]
    pub fn compare(old: Option<&Snapshot>, new: Option<&Snapshot>) -> TrendReport {
        let (Some(old), Some(new)) = (old, new) else {
            return TrendReport::empty();
        };

        let words: BTreeSet<&str> = old.words().chain(new.words()).collect();

        let rows = words
            .into_iter()
            .map(|word| Self::row(word, old.count(word), new.count(word)))
            .collect();

        TrendReport { rows }
    }

    fn row(word: &str, count_old: f64, count_new: f64) -> TrendRow {
        let change = count_new - count_old;

        let change_rate = if count_old == 0.0 {
            if count_new == 0.0 {
                0.0
            } else {
                NEW_WORD_RATE
            }
        } else {
            change / count_old
        };

        let class = if count_old > 0.0 && count_new > 0.0 {
            TrendClass::Common
        } else if count_old == 0.0 {
            TrendClass::New
        } else {
            TrendClass::Lost
        };

        TrendRow {
            word: word.to_string(),
            count_old,
            count_new,
            change,
            change_rate,
            class,
        }
    }
}

/// Average a set of snapshots word by word
///
/// A word missing from some snapshots contributes 0 for those, so the divisor
/// is always the number of snapshots. Returns an empty snapshot for no input.
#[must_use]
pub fn mean_snapshot<'a, I>(snapshots: I) -> Snapshot
where
    I: IntoIterator<Item = &'a Snapshot>,
{
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut n = 0usize;

    for snapshot in snapshots {
        n += 1;
        for (word, count) in snapshot.iter() {
            *totals.entry(word).or_insert(0.0) += count;
        }
    }

    if n == 0 {
        return Snapshot::new();
    }

    let n = n as f64;
    Snapshot::from_counts(totals.into_iter().map(|(word, total)| (word, total / n)))
}
