//! .env file parsing.
//!
//! Parses the standard `KEY=value` dotenv format: comments, blank lines,
//! optional `export ` prefixes, single/double quoted values, and values
//! containing `=`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

/// Parse dotenv content into a sorted map of variables.
pub fn parse_env_file(content: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        if let Some((key, value)) = split_assignment(line) {
            vars.insert(key, value);
        }
    }

    vars
}

fn split_assignment(line: &str) -> Option<(String, String)> {
    let eq = line.find('=')?;
    let key = line[..eq].trim();
    if key.is_empty() {
        return None;
    }
    let value = unquote(line[eq + 1..].trim());
    Some((key.to_string(), value))
}

fn unquote(value: &str) -> String {
    let quoted = (value.starts_with('"') && value.ends_with('"'))
        || (value.starts_with('\'') && value.ends_with('\''));
    if quoted && value.len() >= 2 {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

/// Load and parse an env file from disk.
pub fn load_env_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_env_file(&content))
}

/// Load an env file, returning an empty map if it doesn't exist.
pub fn load_env_file_optional(path: &Path) -> Result<BTreeMap<String, String>> {
    if path.exists() {
        load_env_file(path)
    } else {
        Ok(BTreeMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_assignments() {
        let vars = parse_env_file("SNOWFLAKE_ACCOUNT=abc123\nSNOWFLAKE_USER=loader\n");
        assert_eq!(vars.get("SNOWFLAKE_ACCOUNT").unwrap(), "abc123");
        assert_eq!(vars.get("SNOWFLAKE_USER").unwrap(), "loader");
    }

    #[test]
    fn skips_comments_and_blanks() {
        let vars = parse_env_file("# credentials\n\nKEY=value\n   # indented comment\n");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("KEY").unwrap(), "value");
    }

    #[test]
    fn strips_export_prefix() {
        let vars = parse_env_file("export DBT_TARGET=dev\n");
        assert_eq!(vars.get("DBT_TARGET").unwrap(), "dev");
    }

    #[test]
    fn unquotes_values() {
        let vars = parse_env_file("A=\"double quoted\"\nB='single quoted'\nC=bare\n");
        assert_eq!(vars.get("A").unwrap(), "double quoted");
        assert_eq!(vars.get("B").unwrap(), "single quoted");
        assert_eq!(vars.get("C").unwrap(), "bare");
    }

    #[test]
    fn keeps_equals_in_values() {
        let vars = parse_env_file("URL=https://example.com?a=1&b=2\n");
        assert_eq!(vars.get("URL").unwrap(), "https://example.com?a=1&b=2");
    }

    #[test]
    fn handles_empty_values_and_whitespace() {
        let vars = parse_env_file("EMPTY=\nSPACED = padded value \n");
        assert_eq!(vars.get("EMPTY").unwrap(), "");
        assert_eq!(vars.get("SPACED").unwrap(), "padded value");
    }

    #[test]
    fn ignores_lines_without_assignment() {
        let vars = parse_env_file("not an assignment\n=nokey\nKEY=ok\n");
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn load_optional_missing_file_is_empty() {
        let vars = load_env_file_optional(Path::new("/nonexistent/.env")).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn load_reads_from_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(".env");
        std::fs::write(&path, "FROM_DISK=yes\n").unwrap();
        let vars = load_env_file(&path).unwrap();
        assert_eq!(vars.get("FROM_DISK").unwrap(), "yes");
    }
}
