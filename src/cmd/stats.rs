use super::source::import_selection;
use super::SelectionArgs;
use erd_viewer::importer::ImportDiagnostics;
use erd_viewer::stats::SchemaStats;
use schemars::JsonSchema;
use serde::Serialize;

/// JSON output for the stats command
#[derive(Serialize, JsonSchema)]
pub struct StatsJsonOutput {
    pub database: String,
    pub schema: String,
    pub stats: SchemaStats,
    pub diagnostics: ImportDiagnostics,
}

pub fn run(selection: SelectionArgs, json: bool) -> anyhow::Result<()> {
    let selected = import_selection(&selection)?;
    let stats = SchemaStats::from_import(&selected.import);

    if json {
        let output = StatsJsonOutput {
            database: selected.database,
            schema: selected.schema,
            stats,
            diagnostics: selected.import.diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Schema: {}.{}\n", selected.database, selected.schema);
    println!(
        "{:<14} {:>8}    {:<14} {:>8}",
        "Tables", stats.tables, "Views", stats.views
    );
    println!(
        "{:<14} {:>8}    {:<14} {:>8}",
        "Columns", stats.columns, "Relationships", stats.relationships
    );
    println!();

    println!("Keys & constraints");
    println!("  Primary keys:      {}", stats.primary_keys);
    println!("  Foreign keys:      {}", stats.foreign_keys);
    println!("  Unique columns:    {}", stats.unique_columns);
    println!("  Identity columns:  {}", stats.identity_columns);
    println!();

    println!("Column properties");
    println!("  Nullable:          {}", stats.nullable_columns);
    println!("  Not nullable:      {}", stats.not_nullable_columns);
    if let Some(ratio) = stats.nullable_ratio {
        println!("  Nullable ratio:    {:.1}%", ratio);
    }
    println!();

    if !stats.table_details.is_empty() {
        println!(
            "{:<32} {:>8} {:>5} {:>5}  {}",
            "Table", "Columns", "PKs", "FKs", "Comment"
        );
        println!("{}", "─".repeat(80));
        for detail in &stats.table_details {
            println!(
                "{:<32} {:>8} {:>5} {:>5}  {}",
                truncate_string(&detail.name, 32),
                detail.columns,
                detail.primary_keys,
                detail.foreign_keys,
                detail.comment
            );
        }
        println!();
    }

    if !stats.datatype_distribution.is_empty() {
        println!("Data type distribution");
        for entry in &stats.datatype_distribution {
            println!("  {:<20} {:>6}", entry.datatype, entry.count);
        }
        println!();
    }

    if stats.relationships == 0 {
        println!(
            "No foreign key relationships found. Define FK constraints to see relationships in the ERD."
        );
    }

    print_diagnostics(&selected.import.diagnostics);
    Ok(())
}

fn print_diagnostics(diagnostics: &ImportDiagnostics) {
    if diagnostics.type_fallbacks > 0 {
        eprintln!(
            "Note: {} column(s) have an unparseable type and show as 'unknown'",
            diagnostics.type_fallbacks
        );
    }
    let dropped = diagnostics.fk_rows_unresolved
        + diagnostics.fk_rows_cross_schema
        + diagnostics.fk_rows_malformed;
    if dropped > 0 {
        eprintln!(
            "Note: {} of {} imported key rows dropped ({} unresolved, {} cross-schema, {} malformed)",
            dropped,
            diagnostics.fk_rows.len(),
            diagnostics.fk_rows_unresolved,
            diagnostics.fk_rows_cross_schema,
            diagnostics.fk_rows_malformed
        );
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
