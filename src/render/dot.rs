//! Graphviz DOT output for ERD diagrams.

use crate::render::{GraphOptions, Theme};
use crate::schema::{format_identifier, Column, KeyConstraint, Schema, Table};

/// Generate a DOT digraph with one node per table and one edge per foreign key
pub fn to_dot(schema: &Schema, theme: &Theme, options: &GraphOptions) -> String {
    let mut output = String::new();

    // Header
    output.push_str("digraph {\n");
    output.push_str("  graph [ rankdir=\"LR\" bgcolor=\"#ffffff\" ]\n");
    output.push_str(&format!(
        "  node [ style=\"filled\" shape=\"{}\" gradientangle=\"180\" ]\n",
        escape_attr(&theme.shape)
    ));
    output.push_str("  edge [ arrowhead=\"none\" arrowtail=\"none\" dir=\"both\" ]\n\n");

    for table in schema.iter() {
        output.push_str(&node_block(table, theme, options));
    }

    output.push('\n');

    for table in schema.iter() {
        for constraint in &table.foreign_keys {
            if let Some(edge) = edge_line(schema, table, constraint, theme) {
                output.push_str(&edge);
            }
        }
    }

    output.push_str("}\n");
    output
}

/// One node block with an HTML-like label
fn node_block(table: &Table, theme: &Theme, options: &GraphOptions) -> String {
    let fillcolor = if options.show_columns {
        &theme.fillcolor_columns
    } else {
        &theme.fillcolor
    };
    let colspan = if options.show_types { "2" } else { "1" };
    let title = escape_html(&format_identifier(&table.name, options.upper_case, false));

    let mut s = format!("  {} [\n", table.label);
    s.push_str(&format!(
        "    fillcolor=\"{}\" color=\"{}\" penwidth=\"1\"\n",
        escape_attr(fillcolor),
        escape_attr(&theme.color)
    ));
    s.push_str(&format!(
        "    label=<<table style=\"{}\" border=\"0\" cellborder=\"0\" cellspacing=\"0\" cellpadding=\"1\">\n",
        escape_attr(&theme.style)
    ));
    s.push_str(&format!(
        "      <tr><td bgcolor=\"{}\" align=\"center\" colspan=\"{}\"><font color=\"{}\"><b>{}</b></font></td></tr>\n",
        escape_attr(&theme.bgcolor),
        colspan,
        escape_attr(&theme.tcolor),
        title
    ));

    if options.show_columns {
        for column in &table.columns {
            s.push_str(&column_row(column, theme, options));
        }
    }

    s.push_str("    </table>>\n  ]\n");
    s
}

/// Row text: underline for PK, italics for FK, then `*`, ` I`, ` U` markers
fn column_text(column: &Column, upper_case: bool) -> String {
    let mut name = escape_html(&format_identifier(&column.name, upper_case, false));
    if column.is_primary_key() {
        name = format!("<u>{}</u>", name);
    }
    if column.is_foreign_key() {
        name = format!("<i>{}</i>", name);
    }
    if column.nullable {
        name.push('*');
    }
    if column.identity {
        name.push_str(" I");
    }
    if column.unique {
        name.push_str(" U");
    }
    name
}

fn column_row(column: &Column, theme: &Theme, options: &GraphOptions) -> String {
    let name = column_text(column, options.upper_case);
    let icolor = escape_attr(&theme.icolor);

    if options.show_types {
        let datatype = if options.upper_case {
            column.datatype.to_uppercase()
        } else {
            column.datatype.clone()
        };
        format!(
            "      <tr><td align=\"left\"><font color=\"{}\">{}&nbsp;</font></td>\n        <td align=\"left\"><font color=\"{}\">{}</font></td></tr>\n",
            icolor,
            name,
            icolor,
            escape_html(&datatype)
        )
    } else {
        format!(
            "      <tr><td align=\"left\"><font color=\"{}\">{}</font></td></tr>\n",
            icolor, name
        )
    }
}

/// One edge per constraint, from the referencing table to the referenced one.
///
/// Dashed when the first column is nullable; crow's foot unless both tables
/// have the same number of primary key columns.
fn edge_line(
    schema: &Schema,
    table: &Table,
    constraint: &KeyConstraint,
    theme: &Theme,
) -> Option<String> {
    let first = table.column(constraint.first()?)?;
    let target = schema.table(first.fk_target?.table)?;

    let dashed = if first.nullable {
        " style=\"dashed\""
    } else {
        ""
    };
    let arrow = if table.primary_key.len() == target.primary_key.len() {
        ""
    } else {
        " arrowtail=\"crow\""
    };

    Some(format!(
        "  {} -> {} [ penwidth=\"{}\" color=\"{}\"{}{} ]\n",
        table.label,
        target.label,
        escape_attr(&theme.penwidth),
        escape_attr(&theme.pencolor),
        dashed,
        arrow
    ))
}

/// Escape a string for use in DOT HTML labels
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape a string for use inside a quoted DOT attribute
fn escape_attr(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
