use axum::{http::StatusCode, response::IntoResponse, Json};
use crate::errors::VulnsnipError;
use super::models::ErrorResponse;
use tracing::{error, warn};

impl IntoResponse for VulnsnipError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            VulnsnipError::NotFound(_) => StatusCode::NOT_FOUND,
            VulnsnipError::Validation(_) => StatusCode::BAD_REQUEST,
            VulnsnipError::CommandRejected(_) => StatusCode::FORBIDDEN,
            VulnsnipError::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VulnsnipError::BrokenBoundary(_) => StatusCode::UNPROCESSABLE_ENTITY,
            VulnsnipError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error_type = self.classify().error_type, error = %self, "Request failed");
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Status policy of the snippet routes: only unknown keys, malformed bodies
/// and broken snippet boundaries change the status; every other failure is
/// reported as 200 with an error body.
pub fn snippet_status(err: &VulnsnipError) -> StatusCode {
    match err.classify().error_type {
        "NotFound" => StatusCode::NOT_FOUND,
        "ValidationError" => StatusCode::BAD_REQUEST,
        "BrokenBoundary" => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    }
}

/// Error returned by the snippet handlers.
#[derive(Debug)]
pub struct SnippetError(pub VulnsnipError);

impl From<VulnsnipError> for SnippetError {
    fn from(err: VulnsnipError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SnippetError {
    fn into_response(self) -> axum::response::Response {
        let status = snippet_status(&self.0);
        let class = self.0.classify();
        if !class.client_error {
            warn!(error_type = class.error_type, error = %self.0, status = status.as_u16(), "Snippet request failed");
        }
        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}
