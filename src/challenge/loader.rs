use regex::Regex;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use crate::errors::VulnsnipError;
use super::snippet::SnippetRecord;
use tracing::{debug, info, warn};

const START_MARKER: &str = "vuln-code-snippet start";

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\s*(?://+|#+)?\s*vuln-code-snippet\s+(start|end|vuln-line|neutral-line|hide-line|hide-start|hide-end)\b(.*)$",
    )
    .expect("marker pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker<'a> {
    Start(&'a str),
    End(&'a str),
    VulnLine(&'a str),
    NeutralLine(&'a str),
    HideLine,
    HideStart,
    HideEnd,
}

impl Marker<'_> {
    fn names(&self, key: &str) -> bool {
        let keys = match self {
            Marker::Start(k) | Marker::End(k) | Marker::VulnLine(k) | Marker::NeutralLine(k) => k,
            _ => return false,
        };
        keys.split_whitespace().any(|k| k == key)
    }
}

/// Find a marker comment on `line`, returning the byte offset where the
/// comment begins so the code before it can be kept.
fn parse_marker(line: &str) -> Option<(usize, Marker<'_>)> {
    let caps = MARKER_RE.captures(line)?;
    let offset = caps.get(0)?.start();
    let rest = caps.get(2).map_or("", |m| m.as_str());
    let marker = match caps.get(1)?.as_str() {
        "start" => Marker::Start(rest),
        "end" => Marker::End(rest),
        "vuln-line" => Marker::VulnLine(rest),
        "neutral-line" => Marker::NeutralLine(rest),
        "hide-line" => Marker::HideLine,
        "hide-start" => Marker::HideStart,
        "hide-end" => Marker::HideEnd,
        _ => return None,
    };
    Some((offset, marker))
}

/// Extract every annotated snippet declared in one source file.
pub fn parse_source(content: &str) -> Result<Vec<SnippetRecord>, VulnsnipError> {
    let lines: Vec<&str> = content.lines().collect();

    let mut keys: Vec<&str> = Vec::new();
    for line in &lines {
        if let Some((_, Marker::Start(rest))) = parse_marker(line) {
            for key in rest.split_whitespace() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
    }

    keys.into_iter()
        .map(|key| extract_snippet(&lines, key))
        .collect()
}

fn extract_snippet(lines: &[&str], key: &str) -> Result<SnippetRecord, VulnsnipError> {
    let start = lines.iter().position(|l| {
        matches!(parse_marker(l), Some((_, m @ Marker::Start(_))) if m.names(key))
    });
    let end = lines.iter().rposition(|l| {
        matches!(parse_marker(l), Some((_, m @ Marker::End(_))) if m.names(key))
    });
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if e > s => (s, e),
        _ => return Err(VulnsnipError::BrokenBoundary(key.to_string())),
    };

    let mut kept: Vec<&str> = Vec::with_capacity(end - start);
    let mut hiding = false;
    for line in &lines[start + 1..end] {
        match parse_marker(line).map(|(_, m)| m) {
            Some(Marker::Start(_)) | Some(Marker::End(_)) | Some(Marker::HideLine) => {}
            Some(Marker::HideStart) => hiding = true,
            Some(Marker::HideEnd) => hiding = false,
            _ if hiding => {}
            _ => kept.push(line),
        }
    }

    let joined = kept.join("\n");
    let mut vuln_lines = BTreeSet::new();
    let mut neutral_lines = BTreeSet::new();
    let mut rendered: Vec<&str> = Vec::new();

    for (idx, line) in joined.trim().lines().enumerate() {
        let number = (idx + 1) as u32;
        match parse_marker(line) {
            Some((offset, marker @ (Marker::VulnLine(_) | Marker::NeutralLine(_)))) => {
                if marker.names(key) {
                    if matches!(marker, Marker::VulnLine(_)) {
                        vuln_lines.insert(number);
                    } else {
                        neutral_lines.insert(number);
                    }
                }
                rendered.push(line[..offset].trim_end());
            }
            _ => rendered.push(line),
        }
    }

    SnippetRecord::new(key, rendered.join("\n"), vuln_lines, neutral_lines)
}

/// Discovers annotated snippets under a set of source directories.
#[derive(Debug, Clone)]
pub struct SnippetLoader {
    source_dirs: Vec<PathBuf>,
}

impl SnippetLoader {
    pub fn new(source_dirs: Vec<PathBuf>) -> Self {
        Self { source_dirs }
    }

    pub fn load(&self) -> Result<BTreeMap<String, SnippetRecord>, VulnsnipError> {
        let mut snippets = BTreeMap::new();

        for dir in &self.source_dirs {
            if !dir.exists() {
                debug!(dir = %dir.display(), "Snippet source directory missing, skipping");
                continue;
            }

            let pattern = dir.join("**").join("*");
            let pattern_str = pattern.to_string_lossy();

            for entry in glob::glob(&pattern_str)
                .map_err(|e| VulnsnipError::Config(format!("Invalid glob pattern: {}", e)))?
            {
                let path = entry.map_err(|e| VulnsnipError::Config(format!("Glob error: {}", e)))?;
                if !path.is_file() {
                    continue;
                }
                load_file(&path, &mut snippets)?;
            }
        }

        info!(challenges = snippets.len(), "Loaded code challenge catalog");
        Ok(snippets)
    }
}

fn load_file(path: &Path, snippets: &mut BTreeMap<String, SnippetRecord>) -> Result<(), VulnsnipError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            debug!(file = %path.display(), "Skipping non-UTF-8 file");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if !content.contains(START_MARKER) {
        return Ok(());
    }

    let records = parse_source(&content)?;
    debug!(file = %path.display(), snippets = records.len(), "Parsed code snippets");

    for record in records {
        match snippets.entry(record.key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(_) => {
                warn!(key = %record.key, file = %path.display(), "Duplicate challenge key, keeping first definition");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ROUTE: &str = "\
const express = require('express')
// vuln-code-snippet start xss-1 xssBonus
module.exports = function search () {
  const q = req.query.q // vuln-code-snippet neutral-line xss-1
  const hidden = 1 // vuln-code-snippet hide-line
  // vuln-code-snippet hide-start
  secretSetup()
  // vuln-code-snippet hide-end
  res.send(q) // vuln-code-snippet vuln-line xss-1 xssBonus
}
// vuln-code-snippet end xss-1 xssBonus
";

    #[test]
    fn test_parse_source_extracts_lines() {
        let records = parse_source(ROUTE).unwrap();
        assert_eq!(records.len(), 2);

        let xss = &records[0];
        assert_eq!(xss.key, "xss-1");
        assert_eq!(
            xss.snippet,
            "module.exports = function search () {\n  const q = req.query.q\n  res.send(q)\n}"
        );
        assert_eq!(xss.vuln_lines.iter().copied().collect::<Vec<_>>(), vec![3]);
        assert_eq!(xss.neutral_lines.iter().copied().collect::<Vec<_>>(), vec![2]);

        let bonus = &records[1];
        assert_eq!(bonus.key, "xssBonus");
        assert_eq!(bonus.vuln_lines.iter().copied().collect::<Vec<_>>(), vec![3]);
        assert!(bonus.neutral_lines.is_empty());
    }

    #[test]
    fn test_key_match_is_whole_token() {
        let src = "\
# vuln-code-snippet start dbSchemaChallenge dbSchema
x = 1 # vuln-code-snippet vuln-line dbSchemaChallenge
y = 2 # vuln-code-snippet vuln-line dbSchema
# vuln-code-snippet end dbSchemaChallenge dbSchema
";
        let records = parse_source(src).unwrap();
        let short = records.iter().find(|r| r.key == "dbSchema").unwrap();
        assert_eq!(short.vuln_lines.iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(short.snippet, "x = 1\ny = 2");
    }

    #[test]
    fn test_missing_end_is_broken_boundary() {
        let src = "// vuln-code-snippet start lonely\nfoo()\n";
        let err = parse_source(src).unwrap_err();
        assert!(matches!(err, VulnsnipError::BrokenBoundary(ref k) if k == "lonely"));
        assert_eq!(err.to_string(), "Broken code snippet boundaries for: lonely");
    }

    #[test]
    fn test_end_before_start_is_broken_boundary() {
        let src = "// vuln-code-snippet end k\nfoo()\n// vuln-code-snippet start k\n";
        assert!(matches!(parse_source(src), Err(VulnsnipError::BrokenBoundary(_))));
    }

    #[test]
    fn test_file_without_markers_yields_nothing() {
        assert!(parse_source("fn main() {}\n").unwrap().is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let src = "// vuln-code-snippet start k\r\na()\r\nb() // vuln-code-snippet vuln-line k\r\n// vuln-code-snippet end k\r\n";
        let records = parse_source(src).unwrap();
        assert_eq!(records[0].snippet, "a()\nb()");
        assert!(records[0].vuln_lines.contains(&2));
    }

    #[test]
    fn test_loader_scans_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("routes/nested")).unwrap();
        fs::write(dir.path().join("routes/nested/search.ts"), ROUTE).unwrap();
        fs::write(dir.path().join("routes/plain.ts"), "export {}\n").unwrap();
        fs::write(dir.path().join("routes/blob.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let loader = SnippetLoader::new(vec![dir.path().join("routes"), dir.path().join("missing")]);
        let snippets = loader.load().unwrap();
        assert_eq!(snippets.keys().cloned().collect::<Vec<_>>(), vec!["xss-1", "xssBonus"]);
    }

    #[test]
    fn test_loader_keeps_first_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.ts"),
            "// vuln-code-snippet start dup\nfirst() // vuln-code-snippet vuln-line dup\n// vuln-code-snippet end dup\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.ts"),
            "// vuln-code-snippet start dup\nsecond()\n// vuln-code-snippet end dup\n",
        )
        .unwrap();

        let snippets = SnippetLoader::new(vec![dir.path().to_path_buf()]).load().unwrap();
        assert_eq!(snippets["dup"].snippet, "first()");
    }

    #[test]
    fn test_loader_propagates_broken_boundary() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.ts"), "// vuln-code-snippet start broken\nx\n").unwrap();
        let err = SnippetLoader::new(vec![dir.path().to_path_buf()]).load().unwrap_err();
        assert_eq!(err.classify().error_type, "BrokenBoundary");
    }
}
