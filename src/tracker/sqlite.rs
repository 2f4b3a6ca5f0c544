use async_trait::async_trait;
use crate::db::Database;
use crate::errors::VulnsnipError;
use super::{AttemptStatus, AttemptTracker};

/// Tracker persisted in SQLite. Every increment is one UPSERT statement, so
/// concurrent failures on the same key cannot lose updates.
#[derive(Clone)]
pub struct SqliteTracker {
    db: Database,
}

impl SqliteTracker {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn open(path: &str) -> Result<Self, VulnsnipError> {
        Ok(Self::new(Database::new(path)?))
    }
}

#[async_trait]
impl AttemptTracker for SqliteTracker {
    async fn attempts(&self, key: &str) -> Result<u32, VulnsnipError> {
        Ok(self.db.get_attempt_row(key)?.map(|r| r.attempts).unwrap_or(0))
    }

    async fn record_failure(&self, key: &str) -> Result<u32, VulnsnipError> {
        self.db.increment_attempts(key)
    }

    async fn record_success(&self, key: &str) -> Result<(), VulnsnipError> {
        self.db.mark_solved(key)
    }

    async fn reset(&self, key: &str) -> Result<(), VulnsnipError> {
        self.db.delete_attempts(key)?;
        Ok(())
    }

    async fn status(&self, key: &str) -> Result<AttemptStatus, VulnsnipError> {
        Ok(match self.db.get_attempt_row(key)? {
            Some(row) => AttemptStatus::new(key, row.attempts, row.solved, row.solved_at),
            None => AttemptStatus::new(key, 0, false, None),
        })
    }

    fn backend_name(&self) -> &str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn tracker() -> SqliteTracker {
        SqliteTracker::new(Database::in_memory().unwrap())
    }

    #[tokio::test]
    async fn test_unknown_key_is_zero() {
        assert_eq!(tracker().attempts("xss-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_each_failure_adds_one() {
        let t = tracker();
        assert_eq!(t.record_failure("k").await.unwrap(), 1);
        assert_eq!(t.record_failure("k").await.unwrap(), 2);
        assert_eq!(t.attempts("k").await.unwrap(), 2);
        assert_eq!(t.attempts("k").await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_failures_not_lost() {
        let t = Arc::new(tracker());
        let n = 100;

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let t = t.clone();
                tokio::spawn(async move { t.record_failure("race").await.unwrap() })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(t.attempts("race").await.unwrap(), n);
    }

    #[tokio::test]
    async fn test_success_then_status() {
        let t = tracker();
        t.record_failure("k").await.unwrap();
        t.record_success("k").await.unwrap();
        t.record_success("k").await.unwrap();

        let status = t.status("k").await.unwrap();
        assert!(status.solved);
        assert!(status.solved_at.is_some());
        assert_eq!(status.accuracy, Some(0.5));
    }

    #[tokio::test]
    async fn test_reset() {
        let t = tracker();
        t.record_failure("k").await.unwrap();
        t.reset("k").await.unwrap();
        assert_eq!(t.attempts("k").await.unwrap(), 0);
    }
}
