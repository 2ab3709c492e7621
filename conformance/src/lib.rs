//! Conformance testing of a target binary against a command schema.
//!
//! Each `set` entry of the schema becomes a concrete command line
//! (`<binary> set --file <candidate> <tokens...> <value>`) built from sample
//! values. Commands run sequentially against one shared candidate file and
//! every non-zero exit is recorded in a [`ConformanceReport`].
//!
//! The [`runner::SetInvoker`] trait is the seam between the runner and the
//! process boundary; [`runner::BinaryInvoker`] spawns the real binary.

pub mod error;
pub mod report;
pub mod runner;

use std::path::Path;

use cmdtree_core::load_schema;
use tracing::warn;

pub use error::{ConformanceError, Result};
pub use report::{ConformanceReport, ConformanceSummary, FailureRecord};
pub use runner::{BinaryInvoker, Invocation, SetInvoker, run_conformance};

/// Runs a full conformance pass and writes the report.
///
/// The schema is loaded and the binary resolved before anything runs; either
/// failing is fatal and no report is written. Once both succeed the report is
/// always written, whatever the individual commands returned.
pub fn run_against_binary(schema_file: &Path, binary: &Path, report_file: &Path) -> Result<ConformanceReport> {
    let entries = load_schema(schema_file)?;
    runner::resolve_binary(binary)?;

    let mut invoker = BinaryInvoker::new(binary);
    let report = run_conformance(
        &mut invoker,
        &entries,
        &schema_file.display().to_string(),
        &binary.display().to_string(),
    )?;
    report.write(report_file)?;

    if !report.is_success() {
        warn!(failed = report.set_failed, report = %report_file.display(), "Set commands failed");
    }
    Ok(report)
}
