//! Conformance runner.
//!
//! Every `set` entry is turned into a concrete command line with sample
//! values and handed to a [`SetInvoker`]. All invocations of one run share a
//! single candidate file (`candidate.json` in a temporary directory), so
//! state accumulates across commands in schema order. The directory is
//! removed when the run returns.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use cmdtree_core::sample::{sample_token, sample_value};
use cmdtree_core::{EntryKind, SchemaEntry};
use tracing::{debug, info};

use crate::error::{ConformanceError, Result};
use crate::report::{ConformanceReport, FailureRecord};

/// File name of the shared candidate configuration.
pub const CANDIDATE_FILE: &str = "candidate.json";

/// Captured result of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub stdout: String,
    pub stderr: String,
    pub returncode: i32,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.returncode == 0
    }
}

/// Runs one `set` command against a candidate file.
pub trait SetInvoker {
    /// Invokes `set --file <candidate> <args...>`, where `args` are the
    /// sampled tokens followed by the sampled value.
    fn invoke(&mut self, candidate: &Path, args: &[String]) -> Invocation;
}

/// Invokes an external binary as `<binary> set --file <candidate> <args...>`.
#[derive(Debug, Clone)]
pub struct BinaryInvoker {
    binary: PathBuf,
}

impl BinaryInvoker {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl SetInvoker for BinaryInvoker {
    fn invoke(&mut self, candidate: &Path, args: &[String]) -> Invocation {
        let output = Command::new(&self.binary)
            .arg("set")
            .arg("--file")
            .arg(candidate)
            .args(args)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => Invocation {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                returncode: returncode(output.status),
            },
            Err(err) => Invocation {
                stdout: String::new(),
                stderr: format!("failed to start '{}': {err}", self.binary.display()),
                returncode: -1,
            },
        }
    }
}

/// Maps an exit status to a return code; signal deaths become `-signal`.
#[cfg(unix)]
pub fn returncode(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => -signal,
        (None, None) => -1,
    }
}

#[cfg(not(unix))]
pub fn returncode(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Checks that `binary` can be started.
///
/// A path containing a separator must name an existing file; a bare name
/// is looked up on `PATH`.
pub fn resolve_binary(binary: &Path) -> Result<PathBuf> {
    if binary.components().count() > 1 {
        return if binary.is_file() {
            Ok(binary.to_path_buf())
        } else {
            Err(ConformanceError::BinaryNotFound(binary.to_path_buf()))
        };
    }

    let search_path = env::var_os("PATH").unwrap_or_default();
    env::split_paths(&search_path)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ConformanceError::BinaryNotFound(binary.to_path_buf()))
}

/// Builds the sampled argument list (tokens then value) for a `set` entry.
///
/// # Examples
///
/// ```
/// use cmdtree_core::SchemaEntry;
/// use cmdtree_conformance::runner::sample_args;
///
/// let entry = SchemaEntry::set(["interfaces", "ethernet", "<ifname>", "address"], "<cidr>", "Address");
/// assert_eq!(sample_args(&entry), ["interfaces", "ethernet", "eth0", "address", "10.0.0.0/24"]);
/// ```
pub fn sample_args(entry: &SchemaEntry) -> Vec<String> {
    let mut args: Vec<String> = entry.tokens.iter().map(|token| sample_token(token)).collect();
    args.push(sample_value(entry.value_token_str()));
    args
}

/// Runs every `set` entry through `invoker` and builds the report.
///
/// `schema_file` and `binary` are recorded in the report verbatim.
/// `show` entries are never invoked.
pub fn run_conformance<I: SetInvoker>(
    invoker: &mut I,
    entries: &[SchemaEntry],
    schema_file: &str,
    binary: &str,
) -> Result<ConformanceReport> {
    let set_entries: Vec<&SchemaEntry> = entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::Set)
        .collect();
    let mut report = ConformanceReport::new(schema_file, binary, set_entries.len());

    let workdir = tempfile::tempdir().map_err(ConformanceError::TempDir)?;
    let candidate = workdir.path().join(CANDIDATE_FILE);
    info!(entries = set_entries.len(), candidate = %candidate.display(), "Starting conformance run");

    for entry in set_entries {
        let args = sample_args(entry);
        let invocation = invoker.invoke(&candidate, &args);
        debug!(command = %args.join(" "), returncode = invocation.returncode, "Invoked set command");

        if invocation.success() {
            report.record_pass();
        } else {
            report.record_failure(FailureRecord {
                tokens: entry.tokens.clone(),
                value_token: entry.value_token_str().to_string(),
                stdout: invocation.stdout,
                stderr: invocation.stderr,
                returncode: invocation.returncode,
            });
        }
    }

    info!(
        total = report.set_total,
        passed = report.set_passed,
        failed = report.set_failed,
        "Conformance run finished"
    );
    Ok(report)
}
