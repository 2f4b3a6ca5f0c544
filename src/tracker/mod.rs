pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::errors::VulnsnipError;

pub use memory::MemoryTracker;
pub use sqlite::SqliteTracker;

/// Per-key view of the tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptStatus {
    pub key: String,
    pub attempts: u32,
    pub solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl AttemptStatus {
    pub fn new(key: &str, attempts: u32, solved: bool, solved_at: Option<DateTime<Utc>>) -> Self {
        Self {
            key: key.to_string(),
            attempts,
            solved,
            solved_at,
            accuracy: accuracy(attempts, solved),
        }
    }
}

/// Share of submissions that were correct once the challenge is solved.
pub fn accuracy(failed_attempts: u32, solved: bool) -> Option<f64> {
    solved.then(|| 1.0 / (failed_attempts as f64 + 1.0))
}

/// Counts failed verdicts per challenge key.
///
/// `record_failure` must be atomic per key and return the count it produced,
/// so callers never need a second read that could interleave with another
/// request.
#[async_trait]
pub trait AttemptTracker: Send + Sync {
    /// Failed submissions so far; 0 for unknown keys.
    async fn attempts(&self, key: &str) -> Result<u32, VulnsnipError>;

    /// Add one failure and return the new count.
    async fn record_failure(&self, key: &str) -> Result<u32, VulnsnipError>;

    /// Mark the key solved. Repeated calls are no-ops.
    async fn record_success(&self, key: &str) -> Result<(), VulnsnipError>;

    /// Forget everything recorded for the key.
    async fn reset(&self, key: &str) -> Result<(), VulnsnipError>;

    async fn status(&self, key: &str) -> Result<AttemptStatus, VulnsnipError>;

    /// Backend name for logging
    fn backend_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_unsolved_is_none() {
        assert_eq!(accuracy(3, false), None);
    }

    #[test]
    fn test_accuracy_first_try() {
        assert_eq!(accuracy(0, true), Some(1.0));
    }

    #[test]
    fn test_accuracy_after_failures() {
        assert_eq!(accuracy(3, true), Some(0.25));
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let status = AttemptStatus::new("xss-1", 2, false, None);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["key"], "xss-1");
        assert_eq!(json["attempts"], 2);
        assert!(json.get("solvedAt").is_none());
        assert!(json.get("accuracy").is_none());
    }
}
