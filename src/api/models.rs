use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SnippetResponse {
    pub snippet: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengesResponse {
    pub challenges: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: &'static str,
    pub result: String,
}

impl CommandResponse {
    pub fn success(result: String) -> Self {
        Self { status: "success", result }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { status: "error", error }
    }
}
