//! Plain-text and JSON rendering of analysis results
//!
//! Stored values are never rounded; rounding to two decimals happens here,
//! at display time.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use crate::analytics::{MetricReport, TrendReport};
use crate::models::{AnalysisOutcome, BufferStatus, BurstRow, TopWord, TrendClass};

/// Longest word rendered before truncation
const MAX_WORD_WIDTH: usize = 24;

/// Rows shown per trend table in a full report
pub const DEFAULT_TREND_LIMIT: usize = 10;

fn fit_word(word: &str) -> String {
    if word.chars().count() <= MAX_WORD_WIDTH {
        word.to_string()
    } else {
        let head: String = word.chars().take(MAX_WORD_WIDTH - 3).collect();
        format!("{head}...")
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Message shown while a metric has too little history
pub fn waiting_message(required: usize, available: usize) -> String {
    format!("Waiting for more data ({available}/{required} snapshots)")
}

/// Render trend rows, largest absolute change first
///
/// # Arguments
/// * `view` - Restrict to one class, or `None` for every row
/// * `limit` - Maximum rows to render
#[must_use]
pub fn render_trend_table(report: &TrendReport, view: Option<TrendClass>, limit: usize) -> String {
    let rows = report.top_changes(view, limit);
    if rows.is_empty() {
        return "(no words)\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>10} {:>10} {:>10} {:>8} {:<6}",
        "word", "old", "new", "change", "rate", "class"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<24} {:>10.2} {:>10.2} {:>+10.2} {:>8.2} {:<6}",
            fit_word(&row.word),
            row.count_old,
            row.count_new,
            row.change,
            row.change_rate,
            row.class.as_str()
        );
    }
    out
}

/// Render burst rows in ranking order
#[must_use]
pub fn render_burst_table(rows: &[BurstRow]) -> String {
    if rows.is_empty() {
        return "(no bursts)\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3} {:<24} {:>10} {:>10} {:>12} {:>10}",
        "#", "word", "freq_now", "freq_base", "fold_change", "score"
    );
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3} {:<24} {:>10.2} {:>10.2} {:>12.2} {:>10.2}",
            i + 1,
            fit_word(&row.word),
            row.freq_now,
            row.freq_base,
            row.fold_change,
            row.burst_score
        );
    }
    out
}

/// Render the most frequent words with their share of the total
pub fn render_top_words(words: &[TopWord]) -> String {
    if words.is_empty() {
        return "(no words)\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:>3} {:<24} {:>10} {:>7}", "#", "word", "count", "share");
    for (i, top) in words.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3} {:<24} {:>10.2} {:>6.2}%",
            i + 1,
            fit_word(&top.word),
            top.count,
            top.share * 100.0
        );
    }
    out
}

/// Render one line describing buffer occupancy
pub fn render_status(status: &BufferStatus) -> String {
    format!(
        "{}: {}/{} snapshots{} (oldest {}, latest {})\n",
        status.metric,
        status.size,
        status.capacity,
        if status.is_full() { " [full]" } else { "" },
        format_time(status.oldest),
        format_time(status.latest)
    )
}

fn render_outcome<T>(
    out: &mut String,
    title: &str,
    outcome: &AnalysisOutcome<T>,
    render: impl FnOnce(&T) -> String,
) {
    let _ = writeln!(out, "\n{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
    match outcome {
        AnalysisOutcome::Ready(value) => out.push_str(&render(value)),
        AnalysisOutcome::InsufficientHistory {
            required,
            available,
        } => {
            let _ = writeln!(out, "{}", waiting_message(*required, *available));
        }
    }
}

fn render_trend_sections(report: &TrendReport, limit: usize) -> String {
    let (new, lost, common) = report.class_counts();
    let mut out = format!("{new} new, {lost} lost, {common} common\n");
    for class in [TrendClass::New, TrendClass::Lost, TrendClass::Common] {
        let _ = writeln!(out, "[{class}]");
        out.push_str(&render_trend_table(report, Some(class), limit));
    }
    out
}

/// Render every analysis of a metric as text
#[must_use]
pub fn render_metric_report(report: &MetricReport, limit: usize) -> String {
    let header = format!(
        "Metric: {} ({})",
        report.metric,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let mut out = String::new();
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "=".repeat(header.len()));
    out.push_str(&render_status(&report.status));

    let _ = writeln!(out, "\nTop words\n---------");
    out.push_str(&render_top_words(&report.top_words));

    render_outcome(&mut out, "Recent change", &report.short_horizon, |trend| {
        render_trend_sections(trend, limit)
    });
    render_outcome(&mut out, "Against history", &report.baseline, |trend| {
        render_trend_sections(trend, limit)
    });
    render_outcome(&mut out, "Bursts", &report.bursts, |rows| {
        render_burst_table(rows)
    });

    out
}

/// Serialize a report as pretty JSON
pub fn to_json(report: &MetricReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
