//! Schema statistics for the `stats` command.

use crate::importer::{Import, ImportDiagnostics};
use crate::schema::Schema;
use ahash::AHashMap;
use schemars::JsonSchema;
use serde::Serialize;

/// Comments longer than this are truncated in table details
const COMMENT_PREVIEW_CHARS: usize = 50;

/// Per-table summary
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TableDetail {
    pub name: String,
    pub columns: usize,
    pub primary_keys: usize,
    pub foreign_keys: usize,
    pub comment: String,
}

/// Number of columns sharing a base datatype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct DatatypeCount {
    pub datatype: String,
    pub count: usize,
}

/// Aggregate statistics over an imported schema
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SchemaStats {
    pub tables: usize,
    pub views: usize,
    pub columns: usize,
    /// Foreign key constraints (one per relationship edge)
    pub relationships: usize,
    /// Primary key columns across all tables
    pub primary_keys: usize,
    pub foreign_keys: usize,
    pub unique_columns: usize,
    pub identity_columns: usize,
    pub nullable_columns: usize,
    pub not_nullable_columns: usize,
    /// Percentage of nullable columns, absent when there are no columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable_ratio: Option<f64>,
    pub table_details: Vec<TableDetail>,
    /// Base datatypes by descending count
    pub datatype_distribution: Vec<DatatypeCount>,
}

impl SchemaStats {
    pub fn from_import(import: &Import) -> Self {
        Self::compute(&import.schema, &import.diagnostics)
    }

    pub fn compute(schema: &Schema, diagnostics: &ImportDiagnostics) -> Self {
        let columns = schema.column_count();
        let relationships = schema.foreign_key_count();
        let primary_keys = schema.iter().map(|t| t.primary_key.len()).sum();

        let all_columns = || schema.iter().flat_map(|t| t.columns.iter());
        let nullable_columns = all_columns().filter(|c| c.nullable).count();
        let identity_columns = all_columns().filter(|c| c.identity).count();
        let unique_columns = all_columns().filter(|c| c.unique).count();

        let nullable_ratio = if columns > 0 {
            Some(nullable_columns as f64 / columns as f64 * 100.0)
        } else {
            None
        };

        let table_details = schema
            .iter()
            .map(|t| TableDetail {
                name: t.name.clone(),
                columns: t.columns.len(),
                primary_keys: t.primary_key.len(),
                foreign_keys: t.foreign_keys.len(),
                comment: truncate_comment(&t.comment),
            })
            .collect();

        Self {
            tables: diagnostics.tables,
            views: diagnostics.views,
            columns,
            relationships,
            primary_keys,
            foreign_keys: relationships,
            unique_columns,
            identity_columns,
            nullable_columns,
            not_nullable_columns: columns - nullable_columns,
            nullable_ratio,
            table_details,
            datatype_distribution: datatype_distribution(schema),
        }
    }
}

/// Base type of a datatype string: text before `(`, uppercased
pub fn base_datatype(datatype: &str) -> String {
    let base = datatype.split('(').next().unwrap_or(datatype);
    if base.is_empty() {
        "UNKNOWN".to_string()
    } else {
        base.to_uppercase()
    }
}

/// Count columns per base datatype, most frequent first (ties keep first-seen order)
pub fn datatype_distribution(schema: &Schema) -> Vec<DatatypeCount> {
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut counts: Vec<DatatypeCount> = Vec::new();

    for column in schema.iter().flat_map(|t| t.columns.iter()) {
        let base = base_datatype(&column.datatype);
        match index.get(&base) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(base.clone(), counts.len());
                counts.push(DatatypeCount {
                    datatype: base,
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn truncate_comment(comment: &str) -> String {
    if comment.chars().count() > COMMENT_PREVIEW_CHARS {
        let preview: String = comment.chars().take(COMMENT_PREVIEW_CHARS).collect();
        format!("{}...", preview)
    } else {
        comment.to_string()
    }
}
