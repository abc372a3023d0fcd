//! DDL script output.
//!
//! The script recreates the schema: `CREATE OR REPLACE` for the schema and
//! every table, then one `ALTER TABLE ... ADD CONSTRAINT` per foreign key.
//! Keywords and regular identifiers follow the same case mode throughout.

use crate::schema::{format_identifier, Column, Schema, Table};

/// Keyword casing for one script
#[derive(Debug, Clone, Copy)]
struct Keywords {
    upper_case: bool,
}

impl Keywords {
    fn kw(self, keyword: &'static str) -> String {
        if self.upper_case {
            keyword.to_uppercase()
        } else {
            keyword.to_lowercase()
        }
    }

    fn ident(self, name: &str) -> String {
        format_identifier(name, self.upper_case, true)
    }
}

/// Generate the DDL script for a schema
pub fn to_script(schema: &Schema, database: &str, schema_name: &str, upper_case: bool) -> String {
    let k = Keywords { upper_case };
    let mut output = String::new();

    let db = k.ident(database);
    let qualified = format!("{}.{}", db, k.ident(schema_name));
    output.push_str(&format!("{} {};\n", k.kw("USE DATABASE"), db));
    output.push_str(&format!(
        "{} {};\n\n",
        k.kw("CREATE OR REPLACE SCHEMA"),
        qualified
    ));

    for table in schema.iter() {
        output.push_str(&create_table(table, k));
    }

    for table in schema.iter() {
        for constraint in &table.foreign_keys {
            let columns: Vec<&Column> = constraint
                .columns
                .iter()
                .filter_map(|id| table.column(*id))
                .collect();
            let Some(target_table) = columns
                .first()
                .and_then(|c| c.fk_target)
                .and_then(|r| schema.table(r.table))
            else {
                continue;
            };

            let fk_list: Vec<String> = columns.iter().map(|c| k.ident(&c.name)).collect();
            let pk_list: Vec<String> = columns
                .iter()
                .filter_map(|c| c.fk_target.and_then(|r| schema.column(r)))
                .map(|c| k.ident(&c.name))
                .collect();

            output.push_str(&format!("{} {}\n", k.kw("ALTER TABLE"), k.ident(&table.name)));
            output.push_str(&format!(
                "  {} {}\n",
                k.kw("ADD CONSTRAINT"),
                k.ident(&constraint.name)
            ));
            output.push_str(&format!(
                "  {} ({})\n",
                k.kw("FOREIGN KEY"),
                fk_list.join(", ")
            ));
            output.push_str(&format!(
                "  {} {} ({});\n\n",
                k.kw("REFERENCES"),
                k.ident(&target_table.name),
                pk_list.join(", ")
            ));
        }
    }

    output
}

fn create_table(table: &Table, k: Keywords) -> String {
    let mut s = format!(
        "{} {} (\n",
        k.kw("CREATE OR REPLACE TABLE"),
        k.ident(&table.name)
    );

    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| {
            let datatype = if k.upper_case {
                column.datatype.to_uppercase()
            } else {
                column.datatype.clone()
            };
            let not_null = if column.nullable {
                String::new()
            } else {
                format!(" {}", k.kw("NOT NULL"))
            };
            format!("  {} {}{}", k.ident(&column.name), datatype, not_null)
        })
        .collect();

    if !table.primary_key.is_empty() {
        let pks: Vec<String> = table
            .primary_key_columns()
            .map(|c| k.ident(&c.name))
            .collect();
        lines.push(format!("  {} ({})", k.kw("PRIMARY KEY"), pks.join(", ")));
    }

    s.push_str(&lines.join(",\n"));
    s.push_str("\n);\n\n");
    s
}
