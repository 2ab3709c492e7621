use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cmdtree_core::catalog::Catalog;
use cmdtree_core::matcher::SchemaIndex;
use cmdtree_core::{load_schema, validate_schema};
use cmdtree_discovery::config::ImportConfig;
use cmdtree_discovery::discover::import_schema;
use cmdtree_discovery::output::{OutputFormat, format_catalog};
use cmdtree_discovery::report::failure_code_summary;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cmdtree")]
#[command(about = "Router command schema import and conformance testing")]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract set commands from upstream interface definitions and merge
    /// them into the schema file.
    Import(ImportArgs),
    /// Run every set command of a schema against a target binary.
    Conformance(ConformanceArgs),
    /// Check a schema file for structural violations.
    Validate(ValidateArgs),
    /// Print the schema as a command catalog.
    Catalog(CatalogArgs),
    /// Check a concrete set command against the schema.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ImportArgs {
    /// Upstream checkout containing the renderer and definition templates.
    #[arg(long)]
    upstream_dir: PathBuf,
    /// Schema artifact to merge into and rewrite.
    #[arg(long)]
    schema_file: PathBuf,
    /// YAML import configuration (renderer, definitions dir, allowed roots).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ConformanceArgs {
    /// Schema artifact to test.
    #[arg(long)]
    schema: PathBuf,
    /// Binary invoked as `<binary> set --file <candidate> ...`.
    #[arg(long)]
    binary: PathBuf,
    /// Where to write the JSON report.
    #[arg(long)]
    report: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema artifact to validate.
    #[arg(long)]
    schema: PathBuf,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Schema artifact to render.
    #[arg(long)]
    schema: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema artifact to match against.
    #[arg(long)]
    schema: PathBuf,
    /// Command path tokens followed by the value.
    #[arg(required = true, num_args = 2..)]
    words: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Import(args) => run_import(args),
        Command::Conformance(args) => run_conformance(args),
        Command::Validate(args) => run_validate(args),
        Command::Catalog(args) => run_catalog(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_import(args: ImportArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => ImportConfig::load(path).map_err(|e| e.to_string())?,
        None => ImportConfig::default(),
    };

    let outcome =
        import_schema(&args.upstream_dir, &args.schema_file, &config).map_err(|e| e.to_string())?;

    let skipped = &outcome.extraction.skipped;
    if !skipped.is_empty() {
        let breakdown = failure_code_summary(skipped)
            .into_iter()
            .map(|(code, count)| format!("{code}={count}"))
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!("Skipped {} definition file(s): {breakdown}", skipped.len());
    }

    let summary = serde_json::to_string(&outcome.summary()).map_err(|e| e.to_string())?;
    println!("{summary}");
    Ok(())
}

fn run_conformance(args: ConformanceArgs) -> Result<(), String> {
    let report = cmdtree_conformance::run_against_binary(&args.schema, &args.binary, &args.report)
        .map_err(|e| e.to_string())?;

    let summary = serde_json::to_string(&report.summary()).map_err(|e| e.to_string())?;
    println!("{summary}");

    if report.is_success() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} set command(s) failed; see '{}'",
            report.set_failed,
            report.set_total,
            args.report.display()
        ))
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let entries = load_schema(&args.schema).map_err(|e| e.to_string())?;
    let violations = validate_schema(&entries);
    if violations.is_empty() {
        println!("Validated {} entries.", entries.len());
        return Ok(());
    }

    for violation in &violations {
        eprintln!("{violation}");
    }
    Err(format!(
        "{} violation(s) in '{}'",
        violations.len(),
        args.schema.display()
    ))
}

fn run_catalog(args: CatalogArgs) -> Result<(), String> {
    let entries = load_schema(&args.schema).map_err(|e| e.to_string())?;
    let rendered = format_catalog(&Catalog::build(&entries), args.format)?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let entries = load_schema(&args.schema).map_err(|e| e.to_string())?;
    let Some((value, tokens)) = args.words.split_last() else {
        return Err("expected command tokens followed by a value".to_string());
    };

    let index = SchemaIndex::new(entries);
    let validated = index
        .validate_set_tokens(tokens, value)
        .map_err(|e| e.to_string())?;
    let output = serde_json::json!({
        "path": validated.path,
        "multi": validated.multi,
    });
    println!("{output}");
    Ok(())
}
