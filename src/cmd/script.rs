use super::source::import_selection;
use super::SelectionArgs;
use anyhow::Context;
use erd_viewer::render::to_script;
use std::fs;
use std::path::PathBuf;

pub fn run(selection: SelectionArgs, upper: bool, output: Option<PathBuf>) -> anyhow::Result<()> {
    let selected = import_selection(&selection)?;
    let script = to_script(
        &selected.import.schema,
        &selected.database,
        &selected.schema,
        upper,
    );

    match output {
        Some(path) => {
            fs::write(&path, script.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Script written to: {}", path.display());
        }
        None => print!("{}", script),
    }

    Ok(())
}
