//! Output formatting for command catalogs.

use cmdtree_core::catalog::{Catalog, CatalogCommand};

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a catalog in the requested output format.
pub fn format_catalog(catalog: &Catalog, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(catalog)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(catalog).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(catalog_to_markdown(catalog)),
        OutputFormat::Table => Ok(catalog_to_table(catalog)),
    }
}

fn catalog_to_markdown(catalog: &Catalog) -> String {
    let mut out = String::new();

    out.push_str("# Command Catalog\n\n");
    out.push_str(&format!(
        "**Set commands:** {}  **Show commands:** {}\n\n",
        catalog.set.len(),
        catalog.show.len()
    ));

    for (title, commands) in [("Set", &catalog.set), ("Show", &catalog.show)] {
        if commands.is_empty() {
            continue;
        }
        out.push_str(&format!("## {title}\n\n"));
        out.push_str("| Pattern | Backend | Example | Description |\n");
        out.push_str("|---------|---------|---------|-------------|\n");
        for command in commands {
            out.push_str(&format!(
                "| `{}` | {} | `{}` | {} |\n",
                command.pattern,
                command.backend,
                command.example,
                command.description.replace('|', "\\|"),
            ));
        }
        out.push('\n');
    }

    out
}

fn catalog_to_table(catalog: &Catalog) -> String {
    let mut out = String::new();
    let rows: Vec<&CatalogCommand> = catalog.iter().collect();
    if rows.is_empty() {
        return out;
    }

    let max_pattern = rows.iter().map(|c| c.pattern.len()).max().unwrap_or(7);
    let max_backend = rows.iter().map(|c| c.backend.len()).max().unwrap_or(7);

    for command in rows {
        out.push_str(&format!(
            "{:<4}  {:<pw$}  {:<bw$}  {}\n",
            command.kind.as_str(),
            command.pattern,
            command.backend,
            command.description,
            pw = max_pattern,
            bw = max_backend,
        ));
    }

    out
}
