use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;
use crate::api::errors::SnippetError;
use crate::api::models::{ChallengesResponse, SnippetResponse};
use crate::api::AppState;
use crate::challenge::{Submission, VerdictOutcome};
use crate::errors::VulnsnipError;
use crate::tracker::AttemptStatus;

pub async fn serve_challenges_with_code_snippet(
    State(state): State<AppState>,
) -> Result<Json<ChallengesResponse>, SnippetError> {
    let challenges = state.verifier.list_challenge_keys().await?;
    Ok(Json(ChallengesResponse { challenges }))
}

pub async fn serve_code_snippet(
    State(state): State<AppState>,
    Path(challenge): Path<String>,
) -> Result<Json<SnippetResponse>, SnippetError> {
    let record = state.verifier.retrieve_code_snippet(&challenge).await?;
    Ok(Json(SnippetResponse { snippet: record.snippet.clone() }))
}

fn parse_submission(payload: Result<Json<Value>, JsonRejection>) -> Result<Submission, VulnsnipError> {
    let Json(body) = payload
        .map_err(|e| VulnsnipError::Validation(format!("Invalid request body: {}", e.body_text())))?;
    serde_json::from_value(body)
        .map_err(|e| VulnsnipError::Validation(format!("Invalid submission: {}", e)))
}

pub async fn check_vuln_lines(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<VerdictOutcome>, SnippetError> {
    let submission = parse_submission(payload)?;
    let outcome = state.verifier.check_verdict(&submission).await?;
    Ok(Json(outcome))
}

pub async fn get_attempts(
    State(state): State<AppState>,
    Path(challenge): Path<String>,
) -> Result<Json<AttemptStatus>, SnippetError> {
    Ok(Json(state.verifier.attempt_status(&challenge).await?))
}
