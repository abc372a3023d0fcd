//! Shared catalog fixtures for the library tests.

#![allow(dead_code)]

use erd_viewer::catalog::{
    CatalogError, CatalogQuery, CatalogSnapshot, CatalogStep, RawRow, SnapshotCatalog,
};
use serde_json::{json, Value};

pub const DATABASE: &str = "SALES";
pub const SCHEMA: &str = "PUBLIC";

pub fn row(value: Value) -> RawRow {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub fn rows(values: Vec<Value>) -> Vec<RawRow> {
    values.into_iter().map(row).collect()
}

/// Serialized NUMBER(precision) descriptor
pub fn number(precision: u32, nullable: bool) -> String {
    json!({"type": "FIXED", "precision": precision, "scale": 0, "nullable": nullable})
        .to_string()
}

/// Serialized VARCHAR(length) descriptor
pub fn varchar(length: u32, nullable: bool) -> String {
    json!({"type": "TEXT", "length": length, "fixed": false, "nullable": nullable}).to_string()
}

pub fn table(name: &str) -> Value {
    json!({"name": name, "comment": null, "kind": "TABLE"})
}

pub fn column(table: &str, name: &str, data_type: &str) -> Value {
    json!({
        "table_name": table,
        "schema_name": SCHEMA,
        "column_name": name,
        "data_type": data_type,
        "autoincrement": "",
        "comment": null
    })
}

pub fn primary_key(table: &str, column: &str, constraint: &str, position: u32) -> Value {
    json!({
        "table_name": table,
        "column_name": column,
        "constraint_name": constraint,
        "key_sequence": position
    })
}

pub fn imported_key(
    pk_table: &str,
    pk_column: &str,
    fk_table: &str,
    fk_column: &str,
    fk_name: &str,
) -> Value {
    json!({
        "pk_schema_name": SCHEMA,
        "pk_table_name": pk_table,
        "pk_column_name": pk_column,
        "fk_schema_name": SCHEMA,
        "fk_table_name": fk_table,
        "fk_column_name": fk_column,
        "fk_name": fk_name,
        "key_sequence": 1
    })
}

/// Table A(ID pk) and table B(ID pk, A_ID nullable) with FK_B_A: B.A_ID -> A.ID
pub fn parent_child_snapshot() -> CatalogSnapshot {
    let snapshot = json!({
        "databases": [{"name": DATABASE}],
        "schemas": {
            DATABASE: [{"name": SCHEMA}, {"name": "INFORMATION_SCHEMA"}]
        },
        "objects": {
            "SALES.PUBLIC": {
                "tables": [table("A"), table("B")],
                "views": [],
                "columns": [
                    column("A", "ID", &number(38, false)),
                    column("B", "ID", &number(38, false)),
                    column("B", "A_ID", &number(38, true)),
                ],
                "unique_keys": [],
                "primary_keys": [
                    primary_key("A", "ID", "PK_A", 1),
                    primary_key("B", "ID", "PK_B", 1),
                ],
                "imported_keys": [imported_key("A", "ID", "B", "A_ID", "FK_B_A")]
            }
        }
    });
    serde_json::from_value(snapshot).expect("valid snapshot")
}

pub fn parent_child_catalog() -> SnapshotCatalog {
    SnapshotCatalog::new(parent_child_snapshot())
}

/// Snapshot with only the given step rows recorded for SALES.PUBLIC
pub fn snapshot_with(steps: Vec<(CatalogStep, Vec<Value>)>) -> SnapshotCatalog {
    let mut snapshot = CatalogSnapshot::default();
    let mut objects = erd_viewer::catalog::SchemaSnapshot::default();
    for (step, values) in steps {
        objects.set_rows(step, rows(values));
    }
    snapshot
        .objects
        .insert(format!("{}.{}", DATABASE, SCHEMA), objects);
    SnapshotCatalog::new(snapshot)
}

/// Query failure as a live catalog would report it
pub fn query_failure(query: &CatalogQuery) -> CatalogError {
    CatalogError::Query {
        query: query.sql(),
        message: "SQL compilation error: insufficient privileges".to_string(),
    }
}
