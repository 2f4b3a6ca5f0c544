use serde::Serialize;
use std::collections::BTreeSet;
use crate::errors::VulnsnipError;

/// One annotated code snippet. Line numbers are 1-based into `snippet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetRecord {
    pub key: String,
    pub snippet: String,
    pub vuln_lines: BTreeSet<u32>,
    pub neutral_lines: BTreeSet<u32>,
}

impl SnippetRecord {
    pub fn new(
        key: impl Into<String>,
        snippet: impl Into<String>,
        vuln_lines: impl IntoIterator<Item = u32>,
        neutral_lines: impl IntoIterator<Item = u32>,
    ) -> Result<Self, VulnsnipError> {
        let key = key.into();
        let vuln_lines: BTreeSet<u32> = vuln_lines.into_iter().collect();
        let neutral_lines: BTreeSet<u32> = neutral_lines.into_iter().collect();

        if let Some(line) = vuln_lines.intersection(&neutral_lines).next() {
            return Err(VulnsnipError::InvalidSnippet(format!(
                "line {} of '{}' is marked both vulnerable and neutral",
                line, key
            )));
        }

        Ok(Self {
            key,
            snippet: snippet.into(),
            vuln_lines,
            neutral_lines,
        })
    }

    pub fn line_count(&self) -> usize {
        self.snippet.lines().count()
    }
}
