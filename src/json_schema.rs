//! JSON Schema generation for CLI output types.
//!
//! Schemas are generated with schemars and exported via the `json-schema`
//! subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns all JSON schemas for commands that support --json output.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // stats command
    schemas.insert("stats", schema_for!(crate::cmd::StatsJsonOutput));

    // import diagnostics on their own
    schemas.insert(
        "diagnostics",
        schema_for!(erd_viewer::importer::ImportDiagnostics),
    );

    schemas
}

/// Generate a single schema by command name.
pub fn get_schema(command: &str) -> Option<Schema> {
    all_schemas().remove(command)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
