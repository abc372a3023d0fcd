use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use erd_viewer::catalog::{CatalogSnapshot, SchemaSnapshot, SnapshotCatalog};
use erd_viewer::importer::import_metadata;
use erd_viewer::render::{to_dot, to_script, GraphOptions, Theme};
use serde_json::{json, Value};
use std::hint::black_box;

fn rows(values: Vec<Value>) -> Option<Vec<serde_json::Map<String, Value>>> {
    Some(
        values
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
    )
}

/// A chain of tables, each with an id, a few payload columns and a key to its predecessor
fn generate_catalog(num_tables: usize) -> SnapshotCatalog {
    let number = json!({"type": "FIXED", "precision": 38, "scale": 0, "nullable": false}).to_string();
    let text = json!({"type": "TEXT", "length": 255, "fixed": false, "nullable": true}).to_string();

    let mut tables = Vec::new();
    let mut columns = Vec::new();
    let mut pks = Vec::new();
    let mut fks = Vec::new();

    for i in 0..num_tables {
        let name = format!("T{}", i);
        tables.push(json!({"name": name, "comment": null}));
        columns.push(json!({"table_name": name, "column_name": "ID", "data_type": number}));
        for c in 0..5 {
            columns.push(json!({"table_name": name, "column_name": format!("C{}", c), "data_type": text}));
        }
        pks.push(json!({"table_name": name, "column_name": "ID", "constraint_name": format!("PK_{}", i), "key_sequence": 1}));

        if i > 0 {
            columns.push(json!({"table_name": name, "column_name": "PARENT_ID", "data_type": number}));
            fks.push(json!({
                "pk_schema_name": "PUBLIC", "pk_table_name": format!("T{}", i - 1), "pk_column_name": "ID",
                "fk_schema_name": "PUBLIC", "fk_table_name": name, "fk_column_name": "PARENT_ID",
                "fk_name": format!("FK_{}", i)
            }));
        }
    }

    let objects = SchemaSnapshot {
        tables: rows(tables),
        views: rows(vec![]),
        columns: rows(columns),
        unique_keys: rows(vec![]),
        primary_keys: rows(pks),
        imported_keys: rows(fks),
    };
    let mut snapshot = CatalogSnapshot::default();
    snapshot.objects.insert("BENCH.PUBLIC".to_string(), objects);
    SnapshotCatalog::new(snapshot)
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");

    for num_tables in [10, 100, 500] {
        let catalog = generate_catalog(num_tables);
        group.throughput(Throughput::Elements(num_tables as u64));
        group.bench_with_input(
            BenchmarkId::new("import_metadata", format!("{}_tables", num_tables)),
            &catalog,
            |b, catalog| b.iter(|| import_metadata(catalog, black_box("BENCH"), "PUBLIC").unwrap()),
        );
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let theme = Theme::default();
    let options = GraphOptions {
        show_columns: true,
        show_types: true,
        upper_case: false,
    };

    for num_tables in [10, 100, 500] {
        let catalog = generate_catalog(num_tables);
        let schema = import_metadata(&catalog, "BENCH", "PUBLIC").unwrap().schema;

        group.throughput(Throughput::Elements(num_tables as u64));
        group.bench_with_input(
            BenchmarkId::new("to_dot", format!("{}_tables", num_tables)),
            &schema,
            |b, schema| b.iter(|| to_dot(black_box(schema), &theme, &options)),
        );
        group.bench_with_input(
            BenchmarkId::new("to_script", format!("{}_tables", num_tables)),
            &schema,
            |b, schema| b.iter(|| to_script(black_box(schema), "BENCH", "PUBLIC", true)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_import, bench_render);
criterion_main!(benches);
