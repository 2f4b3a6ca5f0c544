use super::types::VulnsnipError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub client_error: bool,
}

impl VulnsnipError {
    /// Name this error and decide whether the caller caused it.
    ///
    /// The `error_type` string is what the HTTP layer switches on when a
    /// route keeps its own status policy (see `api::errors::snippet_status`).
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Caller-side errors
            VulnsnipError::NotFound(_) => ErrorClassification {
                error_type: "NotFound",
                client_error: true,
            },
            VulnsnipError::Validation(_) => ErrorClassification {
                error_type: "ValidationError",
                client_error: true,
            },
            VulnsnipError::CommandRejected(_) => ErrorClassification {
                error_type: "CommandRejected",
                client_error: true,
            },
            VulnsnipError::PathRejected(_) => ErrorClassification {
                error_type: "PathRejected",
                client_error: true,
            },

            // Corpus and configuration errors
            VulnsnipError::BrokenBoundary(_) => ErrorClassification {
                error_type: "BrokenBoundary",
                client_error: false,
            },
            VulnsnipError::InvalidSnippet(_) => ErrorClassification {
                error_type: "InvalidSnippet",
                client_error: false,
            },
            VulnsnipError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                client_error: false,
            },

            // Runtime failures
            VulnsnipError::Execution(_) => ErrorClassification {
                error_type: "ExecutionFailure",
                client_error: false,
            },
            VulnsnipError::Io(_) => ErrorClassification {
                error_type: "IoError",
                client_error: false,
            },
            VulnsnipError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                client_error: false,
            },
            VulnsnipError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                client_error: false,
            },
            VulnsnipError::Database(_) => ErrorClassification {
                error_type: "DatabaseError",
                client_error: false,
            },
            VulnsnipError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                client_error: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_boundary_named() {
        let err = VulnsnipError::BrokenBoundary("xss-1".into());
        let class = err.classify();
        assert_eq!(class.error_type, "BrokenBoundary");
        assert!(!class.client_error);
    }

    #[test]
    fn test_not_found_is_client_error() {
        let err = VulnsnipError::NotFound("missing".into());
        let class = err.classify();
        assert!(class.client_error);
        assert_eq!(class.error_type, "NotFound");
    }

    #[test]
    fn test_command_rejected_is_client_error() {
        let err = VulnsnipError::CommandRejected("; rm -rf /".into());
        assert!(err.classify().client_error);
    }

    #[test]
    fn test_execution_is_server_error() {
        let err = VulnsnipError::Execution("exit status 2".into());
        assert!(!err.classify().client_error);
        assert_eq!(err.classify().error_type, "ExecutionFailure");
    }

    #[test]
    fn test_database_is_server_error() {
        let err = VulnsnipError::Database("locked".into());
        assert!(!err.classify().client_error);
    }

    #[test]
    fn test_messages_match_wire_text() {
        assert_eq!(
            VulnsnipError::NotFound("abc".into()).to_string(),
            "No code challenge for challenge key: abc"
        );
        assert_eq!(
            VulnsnipError::CommandRejected("x".into()).to_string(),
            "Command not allowed."
        );
        assert_eq!(
            VulnsnipError::Execution("boom".into()).to_string(),
            "Execution failed: boom"
        );
    }
}
