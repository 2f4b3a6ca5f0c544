use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR_STR};
use crate::errors::VulnsnipError;
use tracing::{debug, error, warn};

const HINT_FILE_SUFFIX: &str = ".info.yml";

#[derive(Debug, Deserialize)]
struct HintFile {
    #[serde(default)]
    hints: Option<Vec<Option<String>>>,
}

/// Outcome of looking up the hint file for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintLookup {
    /// Authored hints, in disclosure order.
    Authored(Vec<Option<String>>),
    /// No hint file, or a file without a `hints` field.
    Missing,
    /// Resolved path escaped the hint root.
    Rejected,
    /// File exists but could not be read or parsed.
    Unreadable,
}

/// Keep only `[A-Za-z0-9_-]`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// True when `path` lies strictly below `base`: its string form must start
/// with the base followed by a separator, so `/base-dirXYZ` does not count
/// as inside `/base-dir`.
pub fn is_strictly_inside(base: &Path, path: &Path) -> bool {
    let mut prefix = base.to_string_lossy().into_owned();
    if !prefix.ends_with(MAIN_SEPARATOR_STR) {
        prefix.push_str(MAIN_SEPARATOR_STR);
    }
    let candidate = path.to_string_lossy();
    candidate.len() > prefix.len() && candidate.starts_with(&prefix)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

pub fn fallback_hint(vuln_lines: &BTreeSet<u32>) -> String {
    if vuln_lines.len() == 1 {
        let line = vuln_lines.iter().next().copied().unwrap_or_default();
        format!(
            "Line {} is responsible for this vulnerability or security flaw. Select it and submit to proceed.",
            line
        )
    } else {
        let lines: Vec<String> = vuln_lines.iter().map(|l| l.to_string()).collect();
        format!(
            "Lines {} are responsible for this vulnerability or security flaw. Select them and submit to proceed.",
            lines.join(",")
        )
    }
}

/// File-backed progressive hints, one `<key>.info.yml` per challenge.
#[derive(Debug, Clone)]
pub struct HintStore {
    base_dir: PathBuf,
}

impl HintStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn resolved_base(&self) -> PathBuf {
        match std::fs::canonicalize(&self.base_dir) {
            Ok(p) => p,
            Err(_) => std::path::absolute(&self.base_dir)
                .map(|p| normalize_lexically(&p))
                .unwrap_or_else(|_| self.base_dir.clone()),
        }
    }

    /// Map an untrusted key to its hint file, refusing anything that does
    /// not resolve strictly inside the hint root.
    pub fn resolve_hint_file(&self, key: &str) -> Result<PathBuf, VulnsnipError> {
        let base = self.resolved_base();
        let candidate = base.join(format!("{}{}", sanitize_key(key), HINT_FILE_SUFFIX));

        let resolved = if candidate.exists() {
            std::fs::canonicalize(&candidate).map_err(|e| {
                VulnsnipError::PathRejected(format!("cannot resolve {}: {}", candidate.display(), e))
            })?
        } else {
            normalize_lexically(&candidate)
        };

        if !is_strictly_inside(&base, &resolved) {
            warn!(
                key = %key,
                resolved = %resolved.display(),
                "Potential directory traversal attempt"
            );
            return Err(VulnsnipError::PathRejected(format!(
                "{} is not under {}",
                resolved.display(),
                base.display()
            )));
        }

        Ok(resolved)
    }

    pub async fn load_hints(&self, key: &str) -> HintLookup {
        let path = match self.resolve_hint_file(key) {
            Ok(p) => p,
            Err(_) => return HintLookup::Rejected,
        };

        if !path.exists() {
            debug!(key = %key, "No hint file");
            return HintLookup::Missing;
        }

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Error reading hint file");
                return HintLookup::Unreadable;
            }
        };

        match serde_yaml::from_str::<HintFile>(&content) {
            Ok(HintFile { hints: Some(hints) }) => HintLookup::Authored(hints),
            Ok(HintFile { hints: None }) => HintLookup::Missing,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Error parsing hint file");
                HintLookup::Unreadable
            }
        }
    }

    /// Pick the hint to show after `attempts` failed submissions (1-based).
    pub async fn hint_for(&self, key: &str, attempts: u32, vuln_lines: &BTreeSet<u32>) -> Option<String> {
        match self.load_hints(key).await {
            HintLookup::Missing => Some(fallback_hint(vuln_lines)),
            HintLookup::Authored(hints) if attempts as usize > hints.len() => Some(fallback_hint(vuln_lines)),
            HintLookup::Authored(hints) => {
                let idx = (attempts as usize).checked_sub(1)?;
                hints.get(idx).cloned().flatten().filter(|h| !h.is_empty())
            }
            HintLookup::Rejected | HintLookup::Unreadable => None,
        }
    }
}
