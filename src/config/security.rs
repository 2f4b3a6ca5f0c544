use std::collections::BTreeMap;
use std::path::Path;
use crate::errors::VulnsnipError;
use super::types::CommandSpecConfig;

const SHELL_INTERPRETERS: &[&str] = &[
    "sh",
    "bash",
    "zsh",
    "dash",
    "ksh",
    "fish",
    "csh",
    "tcsh",
    "cmd",
    "cmd.exe",
    "powershell",
    "powershell.exe",
    "pwsh",
];

/// Reject allowlist entries that could turn the gate back into a shell.
pub fn validate_command_table(table: &BTreeMap<String, CommandSpecConfig>) -> Result<(), VulnsnipError> {
    for (id, spec) in table {
        if !is_valid_identifier(id) {
            return Err(VulnsnipError::Config(format!(
                "Command identifier '{}' must only contain letters, digits, '-' or '_'",
                id
            )));
        }

        if spec.executable.trim().is_empty() {
            return Err(VulnsnipError::Config(format!(
                "Command '{}' has an empty executable",
                id
            )));
        }

        let base = Path::new(&spec.executable)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&spec.executable)
            .to_lowercase();
        if SHELL_INTERPRETERS.contains(&base.as_str()) {
            return Err(VulnsnipError::Config(format!(
                "Command '{}' uses shell interpreter '{}'; allowlisted commands must run directly",
                id, spec.executable
            )));
        }

        if spec.args.iter().any(|a| a.contains('\0')) {
            return Err(VulnsnipError::Config(format!(
                "Command '{}' has an argument containing a NUL byte",
                id
            )));
        }
    }
    Ok(())
}

fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
