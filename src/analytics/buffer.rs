//! Bounded, time-ordered buffer of frequency snapshots
//!
//! The buffer keeps the most recent `max_length` snapshots of a single metric.
//! Inserting past capacity silently evicts the oldest entry.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::Snapshot;

/// Default number of retained snapshots
pub const DEFAULT_MAX_LENGTH: usize = 10;

/// A snapshot together with the time it was ingested
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    /// Ingestion time
    pub timestamp: DateTime<Utc>,

    /// The frequency table, shared read-only once stored
    pub snapshot: Arc<Snapshot>,
}

/// Fixed-capacity ring of snapshots, oldest first
///
/// Not synchronized; callers guard it with a lock.
#[derive(Debug, Clone)]
pub struct SnapshotBuffer {
    entries: VecDeque<SnapshotEntry>,
    max_length: usize,
}

impl SnapshotBuffer {
    /// Create a buffer holding at most `max_length` entries (minimum 1)
    #[must_use]
    pub fn new(max_length: usize) -> Self {
        let max_length = max_length.max(1);
        Self {
            entries: VecDeque::with_capacity(max_length),
            max_length,
        }
    }

    /// Create a buffer with the default capacity of 10
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }

    /// Append a snapshot stamped with the current time
    pub fn add(&mut self, snapshot: Snapshot) {
        self.add_at(Utc::now(), snapshot);
    }

    /// Append a snapshot with an explicit timestamp
    ///
    /// A timestamp earlier than the latest entry is raised to the latest
    /// entry's timestamp, keeping entries non-decreasing in time.
    pub fn add_at(&mut self, timestamp: DateTime<Utc>, snapshot: Snapshot) {
        let timestamp = match self.entries.back() {
            Some(latest) if timestamp < latest.timestamp => latest.timestamp,
            _ => timestamp,
        };

        self.entries.push_back(SnapshotEntry {
            timestamp,
            snapshot: Arc::new(snapshot),
        });

        while self.entries.len() > self.max_length {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::debug!(
                    evicted_at = %evicted.timestamp,
                    capacity = self.max_length,
                    "Evicted oldest snapshot"
                );
            }
        }
    }

    /// All retained entries, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SnapshotEntry> + ExactSizeIterator + '_ {
        self.entries.iter()
    }

    /// All retained entries, oldest first
    pub fn get_all(&self) -> Vec<SnapshotEntry> {
        self.entries.iter().cloned().collect()
    }

    /// The last `min(n, size)` entries, oldest of the selection first
    pub fn get_recent(&self, n: usize) -> Vec<SnapshotEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// The oldest retained entry
    pub fn get_oldest(&self) -> Option<&SnapshotEntry> {
        self.entries.front()
    }

    /// The most recent entry
    pub fn get_latest(&self) -> Option<&SnapshotEntry> {
        self.entries.back()
    }

    /// Current number of entries
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.max_length
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SnapshotBuffer {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn numbered(i: usize) -> Snapshot {
        Snapshot::from_counts([(format!("word{i}"), (i + 1) as f64)])
    }

    #[test]
    fn test_add_and_size() {
        let mut buffer = SnapshotBuffer::new(3);
        assert!(buffer.is_empty());
        assert!(buffer.get_oldest().is_none());
        assert!(buffer.get_latest().is_none());

        buffer.add(numbered(0));
        buffer.add(numbered(1));

        assert_eq!(buffer.size(), 2);
        assert_eq!(buffer.capacity(), 3);
        assert!(buffer.get_latest().unwrap().snapshot.contains("word1"));
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let mut buffer = SnapshotBuffer::new(4);
        let k = 3;
        for i in 0..(4 + k) {
            buffer.add(numbered(i));
        }

        assert_eq!(buffer.size(), 4);
        // Oldest is the (k+1)-th inserted entry
        assert!(buffer.get_oldest().unwrap().snapshot.contains(&format!("word{k}")));
        assert!(buffer.get_latest().unwrap().snapshot.contains("word6"));
    }

    #[test]
    fn test_get_recent() {
        let mut buffer = SnapshotBuffer::new(5);
        for i in 0..4 {
            buffer.add(numbered(i));
        }

        let recent = buffer.get_recent(2);
        assert_eq!(recent.len(), 2);
        assert!(recent[0].snapshot.contains("word2"));
        assert!(recent[1].snapshot.contains("word3"));

        // Asking for more than available returns everything
        let all = buffer.get_recent(10);
        assert_eq!(all.len(), 4);
        assert!(all[0].snapshot.contains("word0"));
    }

    #[test]
    fn test_get_all_is_repeatable() {
        let mut buffer = SnapshotBuffer::new(3);
        for i in 0..5 {
            buffer.add(numbered(i));
        }

        assert_eq!(buffer.get_all(), buffer.get_all());
        assert_eq!(buffer.iter().count(), 3);
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let mut buffer = SnapshotBuffer::new(5);
        let now = Utc::now();

        buffer.add_at(now, numbered(0));
        buffer.add_at(now - Duration::minutes(5), numbered(1));
        buffer.add_at(now + Duration::minutes(1), numbered(2));

        let stamps: Vec<_> = buffer.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps[1], now);
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut buffer = SnapshotBuffer::new(0);
        buffer.add(numbered(0));
        buffer.add(numbered(1));

        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.size(), 1);
        assert!(buffer.get_oldest().unwrap().snapshot.contains("word1"));
    }
}
