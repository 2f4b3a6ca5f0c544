use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct VulnsnipConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub challenges: ChallengesConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub debug_commands: DebugCommandsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChallengesConfig {
    /// Directories scanned recursively for `vuln-code-snippet` markers.
    pub source_dirs: Vec<PathBuf>,
    /// Root holding `<key>.info.yml` hint files.
    pub hint_dir: PathBuf,
}

impl Default for ChallengesConfig {
    fn default() -> Self {
        Self {
            source_dirs: vec![
                PathBuf::from("./routes"),
                PathBuf::from("./lib"),
                PathBuf::from("./frontend/src/app"),
            ],
            hint_dir: PathBuf::from("./data/static/codefixes"),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackerBackend {
    #[default]
    Memory,
    Sqlite,
}

impl TrackerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for TrackerBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub backend: TrackerBackend,
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    "./data/vulnsnip.db".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            backend: TrackerBackend::Memory,
            db_path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CommandSpecConfig {
    pub executable: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DebugCommandsConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_allowlist")]
    pub allowlist: BTreeMap<String, CommandSpecConfig>,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_allowlist() -> BTreeMap<String, CommandSpecConfig> {
    let mut table = BTreeMap::new();
    table.insert(
        "list-files-current-dir".to_string(),
        CommandSpecConfig {
            executable: "ls".to_string(),
            args: vec!["-la".to_string()],
        },
    );
    table.insert(
        "show-date".to_string(),
        CommandSpecConfig {
            executable: "date".to_string(),
            args: vec![],
        },
    );
    table
}

impl Default for DebugCommandsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            allowlist: default_allowlist(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_tracker_backend_default() {
        assert_eq!(TrackerBackend::default(), TrackerBackend::Memory);
    }

    #[test]
    fn test_tracker_backend_deserialize() {
        let parsed: TrackerBackend = serde_json::from_str("\"sqlite\"").unwrap();
        assert_eq!(parsed, TrackerBackend::Sqlite);
    }

    #[test]
    fn test_tracker_backend_display() {
        assert_eq!(format!("{}", TrackerBackend::Memory), "memory");
        assert_eq!(format!("{}", TrackerBackend::Sqlite), "sqlite");
    }

    #[test]
    fn test_default_allowlist() {
        let config = DebugCommandsConfig::default();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.allowlist.len(), 2);
        let ls = &config.allowlist["list-files-current-dir"];
        assert_eq!(ls.executable, "ls");
        assert_eq!(ls.args, vec!["-la".to_string()]);
        assert!(config.allowlist["show-date"].args.is_empty());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: VulnsnipConfig = serde_yaml::from_str("server:\n  host: 127.0.0.1\n  port: 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.tracker.backend, TrackerBackend::Memory);
        assert_eq!(config.debug_commands.allowlist.len(), 2);
        assert_eq!(config.challenges.hint_dir, PathBuf::from("./data/static/codefixes"));
    }

    #[test]
    fn test_explicit_allowlist_replaces_default() {
        let yaml = "debug_commands:\n  allowlist:\n    uptime:\n      executable: uptime\n";
        let config: VulnsnipConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.debug_commands.allowlist.len(), 1);
        assert!(config.debug_commands.allowlist["uptime"].args.is_empty());
        assert_eq!(config.debug_commands.timeout_secs, 5);
    }
}
