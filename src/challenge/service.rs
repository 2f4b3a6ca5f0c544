use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::errors::VulnsnipError;
use crate::tracker::{AttemptStatus, AttemptTracker};
use super::catalog::ChallengeCatalog;
use super::hints::HintStore;
use super::snippet::SnippetRecord;
use super::verdict::evaluate;
use tracing::{debug, info};

/// A user's answer for one challenge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub key: String,
    #[serde(default)]
    pub selected_lines: Option<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictOutcome {
    pub verdict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Runs a submission end to end: snippet lookup, verdict, tracker update,
/// hint selection.
pub struct VerificationService {
    catalog: Arc<ChallengeCatalog>,
    hints: HintStore,
    tracker: Arc<dyn AttemptTracker>,
}

impl VerificationService {
    pub fn new(catalog: Arc<ChallengeCatalog>, hints: HintStore, tracker: Arc<dyn AttemptTracker>) -> Self {
        Self { catalog, hints, tracker }
    }

    pub fn tracker(&self) -> &Arc<dyn AttemptTracker> {
        &self.tracker
    }

    pub async fn retrieve_code_snippet(&self, key: &str) -> Result<&SnippetRecord, VulnsnipError> {
        self.catalog
            .get(key)
            .await?
            .ok_or_else(|| VulnsnipError::NotFound(key.to_string()))
    }

    pub async fn list_challenge_keys(&self) -> Result<Vec<String>, VulnsnipError> {
        self.catalog.keys().await
    }

    pub async fn check_verdict(&self, submission: &Submission) -> Result<VerdictOutcome, VulnsnipError> {
        let key = submission.key.as_str();
        let record = self.retrieve_code_snippet(key).await?;

        let passed = evaluate(
            &record.vuln_lines,
            &record.neutral_lines,
            submission.selected_lines.as_deref(),
        );

        if passed {
            self.tracker.record_success(key).await?;
            info!(key = %key, "Vulnerable lines identified");
            return Ok(VerdictOutcome { verdict: true, hint: None });
        }

        let attempts = self.tracker.record_failure(key).await?;
        let hint = self.hints.hint_for(key, attempts, &record.vuln_lines).await;
        debug!(key = %key, attempts, has_hint = hint.is_some(), "Incorrect line selection");

        Ok(VerdictOutcome { verdict: false, hint })
    }

    pub async fn attempt_status(&self, key: &str) -> Result<AttemptStatus, VulnsnipError> {
        self.retrieve_code_snippet(key).await?;
        self.tracker.status(key).await
    }
}
