//! Common test utilities

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use wordpulse::models::{MetricKind, Snapshot};
use wordpulse::provider::{ProviderError, ProviderResult, SnapshotProvider};

/// Build a snapshot from literal pairs
pub fn snapshot(pairs: &[(&str, f64)]) -> Snapshot {
    Snapshot::from_counts(pairs.iter().map(|&(word, count)| (word, count)))
}

/// Eight quiet rounds followed by two rounds where `SuperTopic` explodes
#[allow(dead_code)]
pub fn super_topic_history() -> Vec<Snapshot> {
    let mut history: Vec<Snapshot> = (0..8)
        .map(|_| snapshot(&[("SuperTopic", 1.0), ("NormalTopic", 10.0)]))
        .collect();
    history.extend((0..2).map(|_| snapshot(&[("SuperTopic", 50.0), ("NormalTopic", 10.0)])));
    history
}

/// Scripted provider: pops one queued response per metric fetch
#[allow(dead_code)]
pub struct ScriptedProvider {
    content: Mutex<VecDeque<ProviderResult<Option<Snapshot>>>>,
    title: Mutex<VecDeque<ProviderResult<Option<Snapshot>>>>,
    pub fetches: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            content: Mutex::new(VecDeque::new()),
            title: Mutex::new(VecDeque::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub async fn push(&self, metric: MetricKind, response: ProviderResult<Option<Snapshot>>) {
        self.queue(metric).lock().await.push_back(response);
    }

    fn queue(&self, metric: MetricKind) -> &Mutex<VecDeque<ProviderResult<Option<Snapshot>>>> {
        match metric {
            MetricKind::Content => &self.content,
            MetricKind::Title => &self.title,
        }
    }
}

#[async_trait]
impl SnapshotProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, metric: MetricKind) -> ProviderResult<Option<Snapshot>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.queue(metric)
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Other("script exhausted".to_string())))
    }
}
