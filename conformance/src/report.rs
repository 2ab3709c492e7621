//! Conformance report model and persistence.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConformanceError, Result};

/// One `set` command the target binary rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Path tokens as written in the schema, placeholders included.
    pub tokens: Vec<String>,
    /// Value token as written in the schema; empty when absent.
    pub value_token: String,
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `-N` when killed by signal `N`, `-1` when the binary
    /// could not be started.
    pub returncode: i32,
}

/// Full result of one conformance run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// ISO-8601 UTC start time.
    pub timestamp: String,
    pub schema_file: String,
    pub binary: String,
    pub set_total: usize,
    pub set_passed: usize,
    pub set_failed: usize,
    pub failures: Vec<FailureRecord>,
}

/// One-line summary printed after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceSummary {
    pub set_total: usize,
    pub set_failed: usize,
}

impl ConformanceReport {
    /// Starts an empty report stamped with the current time.
    pub fn new(schema_file: impl Into<String>, binary: impl Into<String>, set_total: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            schema_file: schema_file.into(),
            binary: binary.into(),
            set_total,
            set_passed: 0,
            set_failed: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_pass(&mut self) {
        self.set_passed += 1;
    }

    pub fn record_failure(&mut self, failure: FailureRecord) {
        self.set_failed += 1;
        self.failures.push(failure);
    }

    /// Returns `true` when no command failed.
    pub fn is_success(&self) -> bool {
        self.set_failed == 0
    }

    pub fn summary(&self) -> ConformanceSummary {
        ConformanceSummary {
            set_total: self.set_total,
            set_failed: self.set_failed,
        }
    }

    /// Serializes the report as pretty JSON terminated by a newline.
    pub fn to_json(&self) -> Result<String> {
        let mut raw = serde_json::to_string_pretty(self)?;
        raw.push('\n');
        Ok(raw)
    }

    /// Writes the report to `path`, creating parent directories.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConformanceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let raw = self.to_json()?;
        fs::write(path, raw).map_err(|source| ConformanceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> FailureRecord {
        FailureRecord {
            tokens: vec!["system".to_string(), "host-name".to_string()],
            value_token: "<name>".to_string(),
            stdout: String::new(),
            stderr: "unknown path".to_string(),
            returncode: 2,
        }
    }

    #[test]
    fn test_counts_track_records() {
        let mut report = ConformanceReport::new("schema.json", "routerctl", 3);
        report.record_pass();
        report.record_failure(failure());
        report.record_pass();

        assert_eq!(report.set_passed + report.set_failed, report.set_total);
        assert!(!report.is_success());
        assert_eq!(
            report.summary(),
            ConformanceSummary {
                set_total: 3,
                set_failed: 1
            }
        );
    }

    #[test]
    fn test_json_field_order() {
        let mut report = ConformanceReport::new("schema.json", "routerctl", 1);
        report.record_failure(failure());
        let json = report.to_json().unwrap();

        let keys = ["\"timestamp\"", "\"schema_file\"", "\"binary\"", "\"set_total\"", "\"set_passed\"", "\"set_failed\"", "\"failures\""];
        let positions: Vec<usize> = keys.iter().map(|key| json.find(key).unwrap()).collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{json}");
        assert!(json.contains("\"returncode\": 2"));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_timestamp_is_utc() {
        let report = ConformanceReport::new("s", "b", 0);
        assert!(report.timestamp.ends_with("+00:00"), "{}", report.timestamp);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[test]
    fn test_summary_is_compact_json() {
        let summary = ConformanceSummary {
            set_total: 4,
            set_failed: 0,
        };
        assert_eq!(serde_json::to_string(&summary).unwrap(), r#"{"set_total":4,"set_failed":0}"#);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("nested").join("conformance.json");
        let report = ConformanceReport::new("schema.json", "routerctl", 0);
        report.write(&path).unwrap();

        let loaded: ConformanceReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, report);
    }
}
