use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use crate::errors::VulnsnipError;
use super::{AttemptStatus, AttemptTracker};

#[derive(Debug, Default, Clone)]
struct AttemptRecord {
    attempts: u32,
    solved_at: Option<DateTime<Utc>>,
}

/// Process-local tracker. Each key's entry is updated under its shard lock.
#[derive(Debug, Default)]
pub struct MemoryTracker {
    records: DashMap<String, AttemptRecord>,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttemptTracker for MemoryTracker {
    async fn attempts(&self, key: &str) -> Result<u32, VulnsnipError> {
        Ok(self.records.get(key).map(|r| r.attempts).unwrap_or(0))
    }

    async fn record_failure(&self, key: &str) -> Result<u32, VulnsnipError> {
        let mut entry = self.records.entry(key.to_string()).or_default();
        entry.attempts = entry.attempts.saturating_add(1);
        Ok(entry.attempts)
    }

    async fn record_success(&self, key: &str) -> Result<(), VulnsnipError> {
        let mut entry = self.records.entry(key.to_string()).or_default();
        if entry.solved_at.is_none() {
            entry.solved_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn reset(&self, key: &str) -> Result<(), VulnsnipError> {
        self.records.remove(key);
        Ok(())
    }

    async fn status(&self, key: &str) -> Result<AttemptStatus, VulnsnipError> {
        let record = self.records.get(key).map(|r| r.value().clone()).unwrap_or_default();
        Ok(AttemptStatus::new(
            key,
            record.attempts,
            record.solved_at.is_some(),
            record.solved_at,
        ))
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unknown_key_is_zero() {
        let tracker = MemoryTracker::new();
        assert_eq!(tracker.attempts("xss-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_read_is_idempotent() {
        let tracker = MemoryTracker::new();
        tracker.record_failure("xss-1").await.unwrap();
        let first = tracker.attempts("xss-1").await.unwrap();
        let second = tracker.attempts("xss-1").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_each_failure_adds_one() {
        let tracker = MemoryTracker::new();
        for expected in 1..=5 {
            assert_eq!(tracker.record_failure("xss-1").await.unwrap(), expected);
            assert_eq!(tracker.attempts("xss-1").await.unwrap(), expected);
        }
        assert_eq!(tracker.attempts("other").await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_failures_not_lost() {
        let tracker = Arc::new(MemoryTracker::new());
        let n = 200;

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let tracker = tracker.clone();
                tokio::spawn(async move { tracker.record_failure("race").await.unwrap() })
            })
            .collect();

        let mut returned = Vec::new();
        for h in handles {
            returned.push(h.await.unwrap());
        }
        returned.sort_unstable();

        assert_eq!(tracker.attempts("race").await.unwrap(), n);
        assert_eq!(returned, (1..=n).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_success_is_idempotent() {
        let tracker = MemoryTracker::new();
        tracker.record_failure("k").await.unwrap();
        tracker.record_success("k").await.unwrap();
        let first = tracker.status("k").await.unwrap();
        tracker.record_success("k").await.unwrap();
        let second = tracker.status("k").await.unwrap();

        assert!(second.solved);
        assert_eq!(first.solved_at, second.solved_at);
        assert_eq!(second.attempts, 1);
        assert_eq!(second.accuracy, Some(0.5));
    }

    #[tokio::test]
    async fn test_reset_clears_key() {
        let tracker = MemoryTracker::new();
        tracker.record_failure("k").await.unwrap();
        tracker.record_success("k").await.unwrap();
        tracker.reset("k").await.unwrap();

        let status = tracker.status("k").await.unwrap();
        assert_eq!(status.attempts, 0);
        assert!(!status.solved);
    }
}
