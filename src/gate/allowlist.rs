use std::collections::HashMap;
use crate::config::DebugCommandsConfig;

/// A fully specified invocation. Nothing from a request is ever added to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: String,
    pub executable: String,
    pub args: Vec<String>,
}

/// Fixed map from identifier to invocation, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: HashMap<String, CommandSpec>,
}

impl CommandTable {
    pub fn new(specs: impl IntoIterator<Item = CommandSpec>) -> Self {
        Self {
            entries: specs.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    pub fn from_config(config: &DebugCommandsConfig) -> Self {
        Self::new(config.allowlist.iter().map(|(id, spec)| CommandSpec {
            id: id.clone(),
            executable: spec.executable.clone(),
            args: spec.args.clone(),
        }))
    }

    /// Exact-match lookup. No trimming, case folding or token splitting.
    pub fn lookup(&self, identifier: &str) -> Option<&CommandSpec> {
        self.entries.get(identifier)
    }

    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_table() -> CommandTable {
        CommandTable::from_config(&DebugCommandsConfig::default())
    }

    #[test]
    fn test_default_table_entries() {
        let table = default_table();
        assert_eq!(table.identifiers(), vec!["list-files-current-dir", "show-date"]);
        let spec = table.lookup("list-files-current-dir").unwrap();
        assert_eq!(spec.executable, "ls");
        assert_eq!(spec.args, vec!["-la"]);
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = default_table();
        assert!(table.lookup("show-date ").is_none());
        assert!(table.lookup("SHOW-DATE").is_none());
        assert!(table.lookup("show-date; rm -rf /").is_none());
        assert!(table.lookup("show").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn test_empty_table() {
        let table = CommandTable::default();
        assert!(table.is_empty());
        assert!(table.lookup("ls").is_none());
    }
}
