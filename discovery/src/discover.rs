//! Extraction driver and import workflow.
//!
//! [`extract_definitions`] renders and walks definition files one at a
//! time; a failing file is skipped and recorded. [`import_schema`] wraps
//! that with the curated schema load, merge and artifact write.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use cmdtree_core::{MergeOutcome, SchemaEntry, SchemaError, load_schema, merge_entries, write_schema};
use tracing::{debug, info, warn};

use crate::config::ImportConfig;
use crate::definition::{DefinitionError, DefinitionTree};
use crate::render::{RenderError, Renderer};
use crate::report::{FailureCode, ImportSummary, SkippedDefinition};
use crate::walker::TreeWalker;

/// Typed error for fatal import failures.
#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    /// Filesystem I/O failure.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Curated schema could not be read, parsed, or written.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Import configuration could not be parsed or serialized.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid or missing input (e.g. non-existent upstream directory).
    #[error("{0}")]
    InvalidInput(String),
}

impl DiscoverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a single definition file produced no entries.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Parse(#[from] DefinitionError),
}

impl FileError {
    pub fn failure_code(&self) -> FailureCode {
        match self {
            Self::Render(err) => err.failure_code(),
            Self::Parse(_) => FailureCode::ParseFailed,
        }
    }
}

/// Entries generated from a set of definition files.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    /// Generated entries in walk order, before normalization.
    pub entries: Vec<SchemaEntry>,
    /// Files that rendered and parsed.
    pub processed: Vec<PathBuf>,
    /// Files skipped after a render or parse failure.
    pub skipped: Vec<SkippedDefinition>,
}

/// Result of a full import run.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub merge: MergeOutcome,
    pub extraction: ExtractionOutcome,
}

impl ImportOutcome {
    pub fn summary(&self) -> ImportSummary {
        ImportSummary::new(self.merge.stats, self.extraction.skipped.len())
    }
}

/// Lists entries of `dir` whose names end with `suffix`, sorted by path.
///
/// Hidden files and directories are not filtered out; an entry the
/// renderer cannot handle becomes a skip during extraction.
pub fn collect_definition_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, DiscoverError> {
    let entries = fs::read_dir(dir).map_err(|err| DiscoverError::io(dir, err))?;

    let mut paths = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|err| DiscoverError::io(dir, err))?;
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            paths.insert(entry.path());
        }
    }

    Ok(paths.into_iter().collect())
}

/// Renders, parses, and walks one definition file.
pub fn extract_file(
    renderer: &Renderer,
    walker: &TreeWalker,
    file: &Path,
) -> Result<Vec<SchemaEntry>, FileError> {
    let rendered = renderer.render(file)?;
    let tree = DefinitionTree::parse(&rendered)?;
    Ok(walker.walk_tree(&tree))
}

/// Extracts entries from every file, skipping failures.
///
/// Files are processed sequentially in the order given.
pub fn extract_definitions(renderer: &Renderer, walker: &TreeWalker, files: &[PathBuf]) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();

    for file in files {
        match extract_file(renderer, walker, file) {
            Ok(entries) => {
                debug!(file = %file.display(), entries = entries.len(), "Extracted definition");
                outcome.entries.extend(entries);
                outcome.processed.push(file.clone());
            }
            Err(err) => {
                let code = err.failure_code();
                warn!(file = %file.display(), %code, error = %err, "Skipping definition file");
                outcome.skipped.push(SkippedDefinition {
                    file: file.clone(),
                    code,
                    detail: err.to_string(),
                });
            }
        }
    }

    outcome
}

/// Regenerates the schema artifact at `schema_file` from an upstream
/// checkout.
///
/// The existing artifact is the curated input and wins on duplicates. It is
/// overwritten only after extraction and merge complete.
///
/// # Errors
///
/// Fails when the upstream directory, its definitions directory, or the
/// schema file cannot be read, or when the artifact cannot be written.
/// Per-file render or parse failures are not errors; they are reported in
/// [`ExtractionOutcome::skipped`].
pub fn import_schema(
    upstream_dir: &Path,
    schema_file: &Path,
    config: &ImportConfig,
) -> Result<ImportOutcome, DiscoverError> {
    if !upstream_dir.is_dir() {
        return Err(DiscoverError::InvalidInput(format!(
            "upstream directory '{}' does not exist",
            upstream_dir.display()
        )));
    }

    let curated = load_schema(schema_file)?;
    let files = collect_definition_files(&config.definitions_path(upstream_dir), &config.definition_suffix)?;
    info!(
        upstream = %upstream_dir.display(),
        files = files.len(),
        curated = curated.len(),
        "Importing definitions"
    );

    let renderer = config.renderer(upstream_dir);
    debug!(renderer = %renderer.program().display(), "Using renderer");
    let extraction = extract_definitions(&renderer, &config.walker(), &files);
    let merge = merge_entries(curated, extraction.entries.clone());
    write_schema(schema_file, &merge.entries)?;

    info!(
        total = merge.stats.total,
        duplicates = merge.duplicates_dropped,
        skipped = extraction.skipped.len(),
        "Wrote schema"
    );

    Ok(ImportOutcome { merge, extraction })
}
