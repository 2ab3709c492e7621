//! Structured reporting for schema import runs.

use std::collections::BTreeMap;
use std::path::PathBuf;

use cmdtree_core::SchemaStats;
use serde::{Deserialize, Serialize};

/// Structured failure code for a skipped definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    /// Renderer could not be started.
    RenderSpawn,
    /// Renderer exited with a non-zero status.
    RenderExit,
    /// Renderer exceeded the configured timeout.
    RenderTimeout,
    /// Renderer output could not be read or was not UTF-8.
    RenderOutput,
    /// Rendered output is not a well-formed definition document.
    ParseFailed,
}

impl std::fmt::Display for FailureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RenderSpawn => write!(f, "render_spawn"),
            Self::RenderExit => write!(f, "render_exit"),
            Self::RenderTimeout => write!(f, "render_timeout"),
            Self::RenderOutput => write!(f, "render_output"),
            Self::ParseFailed => write!(f, "parse_failed"),
        }
    }
}

/// A definition file that contributed no entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDefinition {
    pub file: PathBuf,
    pub code: FailureCode,
    /// Human-readable detail about the failure.
    pub detail: String,
}

/// One-line summary printed after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub set: usize,
    pub show: usize,
    pub total: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn new(stats: SchemaStats, skipped: usize) -> Self {
        Self {
            set: stats.set,
            show: stats.show,
            total: stats.total,
            skipped,
        }
    }
}

/// Summarizes failure code distribution across skipped files.
pub fn failure_code_summary(skipped: &[SkippedDefinition]) -> Vec<(FailureCode, usize)> {
    let mut counts: BTreeMap<FailureCode, usize> = BTreeMap::new();
    for skip in skipped {
        *counts.entry(skip.code).or_default() += 1;
    }
    counts.into_iter().collect()
}
