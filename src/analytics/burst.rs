//! Burst detection over a snapshot buffer
//!
//! The buffer is split into a baseline window (oldest entries) and a current
//! window (newest entries). Counts are summed per window, the baseline is
//! scaled down to the current window's length, and every word seen in the
//! current window is scored by how far it rose above its baseline, weighted by
//! its absolute volume:
//!
//! ```text
//! fold_change = (freq_now + ε) / (freq_base + ε)
//! burst_score = fold_change * ln(freq_now + 1)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

use super::buffer::{SnapshotBuffer, SnapshotEntry};
use super::error::{AnalysisError, AnalysisResult};
use crate::models::{AnalysisOutcome, BurstRow};

/// Smoothing term keeping fold change finite for words absent from baseline
pub const EPSILON: f64 = 1e-6;

/// Tuning for [`BurstDetector::detect`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstParams {
    /// Number of newest snapshots forming the current window
    pub current_window_size: usize,

    /// Number of oldest snapshots forming the baseline window
    pub baseline_window_size: usize,

    /// Minimum summed count in the current window
    pub min_freq_now: f64,

    /// Minimum normalized baseline count
    pub min_freq_base: f64,

    /// Maximum number of rows returned
    pub top_k: usize,
}

impl Default for BurstParams {
    fn default() -> Self {
        Self {
            current_window_size: 2,
            baseline_window_size: 8,
            min_freq_now: 3.0,
            min_freq_base: 2.0,
            top_k: 10,
        }
    }
}

impl BurstParams {
    /// Create a params builder
    pub fn builder() -> BurstParamsBuilder {
        BurstParamsBuilder::default()
    }

    /// Number of snapshots both windows need together
    ///
    /// Saturates at `usize::MAX`; [`validate`](Self::validate) rejects sizes
    /// whose sum overflows.
    pub fn required_history(&self) -> usize {
        self.current_window_size.saturating_add(self.baseline_window_size)
    }

    /// Baseline window length over current window length
    pub fn window_ratio(&self) -> f64 {
        self.baseline_window_size as f64 / self.current_window_size as f64
    }

    /// Validate the parameters
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.current_window_size == 0 {
            return Err(AnalysisError::InvalidWindowSize {
                window: "current_window_size",
                size: 0,
            });
        }

        if self.baseline_window_size == 0 {
            return Err(AnalysisError::InvalidWindowSize {
                window: "baseline_window_size",
                size: 0,
            });
        }

        if self
            .current_window_size
            .checked_add(self.baseline_window_size)
            .is_none()
        {
            return Err(AnalysisError::WindowsTooLarge {
                current: self.current_window_size,
                baseline: self.baseline_window_size,
            });
        }

        for (name, value) in [
            ("min_freq_now", self.min_freq_now),
            ("min_freq_base", self.min_freq_base),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidThreshold { name, value });
            }
        }

        Ok(())
    }

    /// Check that a buffer of `capacity` can ever satisfy both windows
    pub fn validate_capacity(&self, capacity: usize) -> AnalysisResult<()> {
        let required = self.required_history();
        if capacity < required {
            return Err(AnalysisError::CapacityTooSmall { capacity, required });
        }
        Ok(())
    }

    /// Index ranges of the baseline and current windows in a buffer of `len`
    ///
    /// Baseline is taken from the head and current from the tail. Fails rather
    /// than letting the ranges share an entry.
    pub fn window_bounds(&self, len: usize) -> AnalysisResult<(Range<usize>, Range<usize>)> {
        let baseline_end = self.baseline_window_size.min(len);
        let current_start = len.saturating_sub(self.current_window_size);

        if current_start < baseline_end {
            return Err(AnalysisError::OverlappingWindows {
                baseline_end,
                current_start,
                len,
            });
        }

        Ok((0..baseline_end, current_start..len))
    }
}

/// Builder for BurstParams
#[derive(Debug, Default)]
pub struct BurstParamsBuilder {
    current_window_size: Option<usize>,
    baseline_window_size: Option<usize>,
    min_freq_now: Option<f64>,
    min_freq_base: Option<f64>,
    top_k: Option<usize>,
}

impl BurstParamsBuilder {
    /// Set current window size
    pub fn current_window_size(mut self, size: usize) -> Self {
        self.current_window_size = Some(size);
        self
    }

    /// Set baseline window size
    pub fn baseline_window_size(mut self, size: usize) -> Self {
        self.baseline_window_size = Some(size);
        self
    }

    /// Set minimum current-window frequency
    pub fn min_freq_now(mut self, value: f64) -> Self {
        self.min_freq_now = Some(value);
        self
    }

    /// Set minimum normalized baseline frequency
    pub fn min_freq_base(mut self, value: f64) -> Self {
        self.min_freq_base = Some(value);
        self
    }

    /// Set result limit
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Build the params
    pub fn build(self) -> AnalysisResult<BurstParams> {
        let defaults = BurstParams::default();
        let params = BurstParams {
            current_window_size: self
                .current_window_size
                .unwrap_or(defaults.current_window_size),
            baseline_window_size: self
                .baseline_window_size
                .unwrap_or(defaults.baseline_window_size),
            min_freq_now: self.min_freq_now.unwrap_or(defaults.min_freq_now),
            min_freq_base: self.min_freq_base.unwrap_or(defaults.min_freq_base),
            top_k: self.top_k.unwrap_or(defaults.top_k),
        };
        params.validate()?;
        Ok(params)
    }
}

/// Ranks words whose current volume jumped above their baseline
#[derive(Debug, Clone, Copy, Default)]
pub struct BurstDetector;

impl BurstDetector {
    /// Detect bursting words in `buffer`
    ///
    /// # Returns
    /// - `Ok(Ready(rows))` ranked by burst score, at most `top_k`
    /// - `Ok(InsufficientHistory)` when the buffer holds fewer entries than
    ///   both windows need
    /// - `Err` for invalid parameters
    pub fn detect(
        buffer: &SnapshotBuffer,
        params: &BurstParams,
    ) -> AnalysisResult<AnalysisOutcome<Vec<BurstRow>>> {
        Self::detect_entries(&buffer.get_all(), params)
    }

    /// Same as [`detect`](Self::detect) over an already materialized entry list
    pub fn detect_entries(
        entries: &[SnapshotEntry],
        params: &BurstParams,
    ) -> AnalysisResult<AnalysisOutcome<Vec<BurstRow>>> {
        params.validate()?;

        let required = params.required_history();
        if entries.len() < required {
            tracing::debug!(
                required,
                available = entries.len(),
                "Not enough history for burst detection"
            );
            return Ok(AnalysisOutcome::InsufficientHistory {
                required,
                available: entries.len(),
            });
        }

        let (baseline_range, current_range) = params.window_bounds(entries.len())?;

        let current = aggregate_window(&entries[current_range]);
        let baseline_total = aggregate_window(&entries[baseline_range]);

        let window_ratio = params.window_ratio();

        let mut rows: Vec<BurstRow> = current
            .into_iter()
            .filter_map(|(word, freq_now)| {
                let freq_base = baseline_total.get(word).copied().unwrap_or(0.0) / window_ratio;

                if freq_now < params.min_freq_now || freq_base < params.min_freq_base {
                    return None;
                }

                let (fold_change, burst_score) = score(freq_now, freq_base);
                Some(BurstRow {
                    word: word.to_string(),
                    freq_now,
                    freq_base,
                    fold_change,
                    burst_score,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.burst_score
                .total_cmp(&a.burst_score)
                .then_with(|| a.word.cmp(&b.word))
        });
        rows.truncate(params.top_k);

        Ok(AnalysisOutcome::Ready(rows))
    }
}

/// Sum each word's count across a window of entries
#[must_use]
pub fn aggregate_window(entries: &[SnapshotEntry]) -> HashMap<&str, f64> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for entry in entries {
        for (word, count) in entry.snapshot.iter() {
            *totals.entry(word).or_insert(0.0) += count;
        }
    }
    totals
}

/// Fold change and burst score for one word
///
/// Returns `(fold_change, burst_score)`.
#[must_use]
pub fn score(freq_now: f64, freq_base: f64) -> (f64, f64) {
    let fold_change = (freq_now + EPSILON) / (freq_base + EPSILON);
    let burst_score = fold_change * (freq_now + 1.0).ln();
    (fold_change, burst_score)
}
