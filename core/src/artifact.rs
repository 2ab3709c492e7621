//! Persisted schema artifact I/O.
//!
//! The schema is stored as a JSON array of [`SchemaEntry`] objects,
//! pretty-printed with two-space indentation and terminated by a newline so
//! repeated runs over unchanged input produce byte-identical files.

use std::fs;
use std::path::Path;

use crate::error::{Result, SchemaError};
use crate::SchemaEntry;

/// Parses a schema artifact from JSON text.
///
/// # Examples
///
/// ```
/// use cmdtree_core::parse_schema;
///
/// let entries = parse_schema(r#"[{"kind": "show", "tokens": ["interfaces"], "description": "Show interfaces"}]"#).unwrap();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].value_token, None);
/// ```
pub fn parse_schema(raw: &str) -> Result<Vec<SchemaEntry>> {
    Ok(serde_json::from_str(raw)?)
}

/// Reads and parses a schema artifact from disk.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Vec<SchemaEntry>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|err| SchemaError::io(path, err))?;
    parse_schema(&raw)
}

/// Serializes entries in the persisted artifact format.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{SchemaEntry, schema_to_json};
///
/// let raw = schema_to_json(&[SchemaEntry::show(["nat"], "Show NAT")]).unwrap();
/// assert!(raw.starts_with("[\n  {\n    \"kind\": \"show\""));
/// assert!(raw.ends_with("]\n"));
/// ```
pub fn schema_to_json(entries: &[SchemaEntry]) -> Result<String> {
    let mut raw = serde_json::to_string_pretty(entries)?;
    raw.push('\n');
    Ok(raw)
}

/// Writes entries to `path`, replacing any previous content.
pub fn write_schema(path: impl AsRef<Path>, entries: &[SchemaEntry]) -> Result<()> {
    let path = path.as_ref();
    let raw = schema_to_json(entries)?;
    fs::write(path, raw).map_err(|err| SchemaError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_load_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("command_schema.json");
        let entries = vec![
            SchemaEntry::set(["interfaces", "bridge", "<ifname>", "member", "interface"], "<ifname>", "Member")
                .with_multi(true),
            SchemaEntry::show(["system", "version"], "Show version"),
        ];

        write_schema(&path, &entries).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n    \"multi\": true\n"));
        assert_eq!(load_schema(&path).unwrap(), entries);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_schema("/nonexistent/cmdtree/schema.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cmdtree/schema.json"));
    }

    #[test]
    fn test_empty_schema_serializes_as_empty_array() {
        assert_eq!(schema_to_json(&[]).unwrap(), "[]\n");
    }
}
