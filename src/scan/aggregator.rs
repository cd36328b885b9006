use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// Fingerprint name to the set of target identifiers that matched it.
///
/// Membership is unique per bucket: a target matching the same fingerprint
/// through two probes is listed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchBucket {
    buckets: BTreeMap<String, BTreeSet<String>>,
}

impl MatchBucket {
    /// Returns false when the target was already in that bucket.
    pub fn insert(&mut self, fingerprint: &str, target: String) -> bool {
        self.buckets
            .entry(fingerprint.to_string())
            .or_default()
            .insert(target)
    }

    #[cfg(test)]
    pub fn get(&self, fingerprint: &str) -> Option<&BTreeSet<String>> {
        self.buckets.get(fingerprint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.buckets.iter()
    }

    /// Number of fingerprints with at least one target.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[derive(Debug)]
struct MatchRecord {
    fingerprint: String,
    target: String,
}

/// Cloneable sender side handed to every worker.
#[derive(Clone)]
pub struct AggregatorHandle {
    tx: mpsc::UnboundedSender<MatchRecord>,
}

impl AggregatorHandle {
    pub fn record(&self, fingerprint: &str, target: String) {
        let record = MatchRecord {
            fingerprint: fingerprint.to_string(),
            target,
        };
        if self.tx.send(record).is_err() {
            tracing::error!("Result aggregator stopped before all matches were recorded");
        }
    }
}

/// Single owner of the [`MatchBucket`]. Workers never touch the map; they
/// send records over a channel and this task applies them one at a time.
pub struct Aggregator {
    task: JoinHandle<MatchBucket>,
}

impl Aggregator {
    pub fn spawn() -> (Self, AggregatorHandle) {
        let (tx, mut rx) = mpsc::unbounded_channel::<MatchRecord>();
        let task = tokio::spawn(async move {
            let mut buckets = MatchBucket::default();
            while let Some(record) = rx.recv().await {
                if !buckets.insert(&record.fingerprint, record.target) {
                    tracing::trace!("Duplicate match for {} ignored", record.fingerprint);
                }
            }
            buckets
        });
        (Self { task }, AggregatorHandle { tx })
    }

    /// Resolves once every [`AggregatorHandle`] has been dropped, so call it
    /// only after the worker pool has been joined.
    pub async fn snapshot(self) -> Result<MatchBucket, JoinError> {
        self.task.await
    }
}
