use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use crate::api::models::CommandResponse;
use crate::api::AppState;
use crate::errors::VulnsnipError;

pub async fn execute_debug_command(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CommandResponse>, VulnsnipError> {
    // The identifier is only ever used as a table key
    let command = payload
        .ok()
        .and_then(|Json(body)| body.get("command").and_then(Value::as_str).map(str::to_owned))
        .filter(|c| !c.is_empty())
        .ok_or_else(|| VulnsnipError::Validation("Invalid command input.".into()))?;

    let result = state.gate.execute(&command).await?;
    Ok(Json(CommandResponse::success(result)))
}
