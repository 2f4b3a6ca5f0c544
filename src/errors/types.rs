use thiserror::Error;

#[derive(Debug, Error)]
pub enum VulnsnipError {
    #[error("No code challenge for challenge key: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Path rejected: {0}")]
    PathRejected(String),

    #[error("Command not allowed.")]
    CommandRejected(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Broken code snippet boundaries for: {0}")]
    BrokenBoundary(String),

    #[error("Invalid snippet: {0}")]
    InvalidSnippet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
