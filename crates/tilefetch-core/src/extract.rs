//! Key/value extraction from line-oriented command output
//! (e.g. `bosh status` style `Name:   value` listings).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// A line prefix to look for and the label its value is recorded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub pattern: String,
    pub label: String,
}

impl Pattern {
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
        }
    }
}

/// Parses `LABEL=PATTERN`; the pattern may itself contain `=`.
impl FromStr for Pattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((label, pattern)) if !label.is_empty() && !pattern.is_empty() => {
                Ok(Pattern::new(pattern, label))
            }
            _ => Err(format!("expected LABEL=PATTERN, got {s:?}")),
        }
    }
}

/// Pattern file layout:
///
/// ```toml
/// [[pattern]]
/// pattern = "Director UUID"
/// label = "uuid"
/// ```
#[derive(Debug, Deserialize)]
struct PatternFile {
    #[serde(default, rename = "pattern")]
    patterns: Vec<Pattern>,
}

/// Load patterns from a TOML file.
pub fn load_patterns(path: &Path) -> Result<Vec<Pattern>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read pattern file {}", path.display()))?;
    let file: PatternFile = toml::from_str(&data)
        .with_context(|| format!("parse pattern file {}", path.display()))?;
    Ok(file.patterns)
}

/// Scans `text` line by line. For every pattern a line starts with, records
/// `label → text after the first colon, trimmed` (the whole line, trimmed,
/// when there is no colon). Later lines overwrite earlier matches.
pub fn extract(text: &str, patterns: &[Pattern]) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();
    for line in text.split('\n') {
        for p in patterns {
            if line.starts_with(p.pattern.as_str()) {
                let value = line.split_once(':').map_or(line, |(_, v)| v).trim();
                result.insert(p.label.clone(), value.to_string());
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_match_wins() {
        let out = extract("Name: foo\nName: bar", &[Pattern::new("Name:", "n")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out["n"], "bar");
    }

    #[test]
    fn bosh_status_output() {
        let text = "Config\n             /home/u/.bosh_config\n\nDirector\n  Name       my-bosh\n  URL        https://10.0.0.6:25555\n  Version    1.3262.0 (00000000)\nDirector UUID: 3c2e4f5a-aaaa-bbbb-cccc-0123456789ab\nDeployment\n  not set\n";
        let patterns = [
            Pattern::new("Director UUID", "director_uuid"),
            Pattern::new("  URL", "url"),
            Pattern::new("Missing", "missing"),
        ];
        let out = extract(text, &patterns);
        assert_eq!(out["director_uuid"], "3c2e4f5a-aaaa-bbbb-cccc-0123456789ab");
        // Only the first colon splits; the port stays in the value.
        assert_eq!(out["url"], "//10.0.0.6:25555");
        assert!(!out.contains_key("missing"));
    }

    #[test]
    fn line_without_colon_records_whole_line() {
        let out = extract("  Version 1.2\r\n", &[Pattern::new("  Version", "v")]);
        assert_eq!(out["v"], "Version 1.2");
    }

    #[test]
    fn several_patterns_on_one_line() {
        let out = extract(
            "Target: prod",
            &[Pattern::new("Target", "a"), Pattern::new("Tar", "b")],
        );
        assert_eq!(out["a"], "prod");
        assert_eq!(out["b"], "prod");
    }

    #[test]
    fn empty_input() {
        assert!(extract("", &[Pattern::new("x", "y")]).is_empty());
        assert!(extract("x: 1", &[]).is_empty());
    }

    #[test]
    fn pattern_from_str() {
        let p: Pattern = "uuid=Director UUID".parse().unwrap();
        assert_eq!(p, Pattern::new("Director UUID", "uuid"));
        let p: Pattern = "eq=a=b".parse().unwrap();
        assert_eq!(p.pattern, "a=b");
        assert!("novalue".parse::<Pattern>().is_err());
        assert!("=x".parse::<Pattern>().is_err());
        assert!("x=".parse::<Pattern>().is_err());
    }

    #[test]
    fn load_pattern_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.toml");
        std::fs::write(
            &path,
            "[[pattern]]\npattern = \"Director UUID\"\nlabel = \"uuid\"\n\n[[pattern]]\npattern = \"  Name\"\nlabel = \"name\"\n",
        )
        .unwrap();
        let patterns = load_patterns(&path).unwrap();
        assert_eq!(
            patterns,
            vec![
                Pattern::new("Director UUID", "uuid"),
                Pattern::new("  Name", "name"),
            ]
        );
    }

    #[test]
    fn load_pattern_file_missing() {
        let err = load_patterns(Path::new("/nonexistent/patterns.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("read pattern file"));
    }
}
