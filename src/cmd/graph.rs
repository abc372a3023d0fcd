//! Graph command implementation for ERD generation.

use super::source::import_selection;
use super::SelectionArgs;
use anyhow::{bail, Context, Result};
use erd_viewer::render::{to_dot, BuiltinTheme, GraphOptions, Theme};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Run the graph command
#[allow(clippy::too_many_arguments)]
pub fn run(
    selection: SelectionArgs,
    theme: Option<String>,
    theme_file: Option<PathBuf>,
    hide_columns: bool,
    types: bool,
    upper: bool,
    output: Option<PathBuf>,
    render: bool,
) -> Result<()> {
    let theme = resolve_theme(theme, theme_file)?;
    let options = GraphOptions {
        show_columns: !hide_columns,
        show_types: types,
        upper_case: upper,
    };

    let selected = import_selection(&selection)?;
    let dot = to_dot(&selected.import.schema, &theme, &options);

    let should_render = render
        || output
            .as_ref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_lowercase().as_str(), "png" | "svg" | "pdf"))
            .unwrap_or(false);

    if should_render {
        match output {
            Some(ref out_path) => render_with_graphviz(&dot, out_path)?,
            None => bail!("--render needs an output file (-o diagram.svg)"),
        }
    } else if let Some(ref out_path) = output {
        let mut file = File::create(out_path)
            .with_context(|| format!("Failed to create {}", out_path.display()))?;
        file.write_all(dot.as_bytes())?;
        eprintln!("ERD written to: {}", out_path.display());
    } else {
        print!("{}", dot);
    }

    let diagnostics = &selected.import.diagnostics;
    eprintln!(
        "\nERD: {} objects ({} tables, {} views), {} columns, {} relationships",
        selected.import.schema.len(),
        diagnostics.tables,
        diagnostics.views,
        diagnostics.columns,
        selected.import.schema.foreign_key_count()
    );

    Ok(())
}

fn resolve_theme(theme: Option<String>, theme_file: Option<PathBuf>) -> Result<Theme> {
    if let Some(path) = theme_file {
        return Theme::load(&path)
            .with_context(|| format!("Failed to load theme: {}", path.display()));
    }
    let builtin = theme
        .map(|t| t.parse::<BuiltinTheme>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{}", e))?
        .unwrap_or_default();
    Ok(builtin.theme())
}

/// Pipe DOT through Graphviz into an image file; the format follows the extension
fn render_with_graphviz(dot_source: &str, output_path: &Path) -> Result<()> {
    let format = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| "png".to_string());

    let mut child = Command::new("dot")
        .arg(format!("-T{}", format))
        .arg("-o")
        .arg(output_path)
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!(
                    "Graphviz 'dot' not found. Install Graphviz, or write .dot output and render it elsewhere."
                )
            } else {
                anyhow::anyhow!("Failed to start Graphviz: {}", e)
            }
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(dot_source.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        bail!(graphviz_failure(
            &output.status.to_string(),
            &String::from_utf8_lossy(&output.stderr)
        ));
    }

    eprintln!("Diagram rendered to: {}", output_path.display());
    Ok(())
}

fn graphviz_failure(status: &str, stderr: &str) -> String {
    let detail = stderr.trim();
    if detail.is_empty() {
        format!("Graphviz failed ({})", status)
    } else {
        format!("Graphviz failed ({}): {}", status, detail)
    }
}
