//! Tests for the DOT and script renderers.

mod common;

use common::*;
use erd_viewer::catalog::CatalogStep;
use erd_viewer::importer::import_metadata;
use erd_viewer::render::{to_dot, to_script, BuiltinTheme, GraphOptions, Theme};
use erd_viewer::schema::Schema;
use serde_json::json;

fn parent_child_schema() -> Schema {
    let catalog = parent_child_catalog();
    import_metadata(&catalog, DATABASE, SCHEMA).unwrap().schema
}

mod script_tests {
    use super::*;

    #[test]
    fn test_parent_child_script_upper() {
        let script = to_script(&parent_child_schema(), DATABASE, SCHEMA, true);
        let expected = "\
USE DATABASE SALES;
CREATE OR REPLACE SCHEMA SALES.PUBLIC;

CREATE OR REPLACE TABLE A (
  ID NUMBER(38) NOT NULL,
  PRIMARY KEY (ID)
);

CREATE OR REPLACE TABLE B (
  ID NUMBER(38) NOT NULL,
  A_ID NUMBER(38),
  PRIMARY KEY (ID)
);

ALTER TABLE B
  ADD CONSTRAINT FK_B_A
  FOREIGN KEY (A_ID)
  REFERENCES A (ID);

";
        assert_eq!(script, expected);
    }

    #[test]
    fn test_parent_child_script_lower() {
        let script = to_script(&parent_child_schema(), DATABASE, SCHEMA, false);

        assert!(script.starts_with("use database sales;\ncreate or replace schema sales.public;\n"));
        assert!(script.contains("create or replace table a (\n  id number(38) not null,\n"));
        assert!(script.contains("alter table b\n  add constraint fk_b_a\n"));
        assert!(!script.contains("NUMBER"));
    }

    #[test]
    fn test_irregular_names_are_quoted() {
        let catalog = snapshot_with(vec![
            (CatalogStep::Tables, vec![table("Order Items")]),
            (
                CatalogStep::Columns,
                vec![column("Order Items", "lineNo", &number(10, true))],
            ),
        ]);
        let schema = import_metadata(&catalog, DATABASE, SCHEMA).unwrap().schema;
        let script = to_script(&schema, DATABASE, SCHEMA, true);

        assert!(script.contains("CREATE OR REPLACE TABLE \"Order Items\" (\n  \"lineNo\" NUMBER(10)\n);"));
    }

    #[test]
    fn test_table_without_primary_key() {
        let catalog = snapshot_with(vec![
            (CatalogStep::Tables, vec![table("LOG")]),
            (
                CatalogStep::Columns,
                vec![
                    column("LOG", "MSG", &varchar(100, true)),
                    column("LOG", "AT", r#"{"type":"TIMESTAMP_NTZ","precision":0,"scale":9,"nullable":false}"#),
                ],
            ),
        ]);
        let schema = import_metadata(&catalog, DATABASE, SCHEMA).unwrap().schema;
        let script = to_script(&schema, DATABASE, SCHEMA, true);

        assert!(script.contains(
            "CREATE OR REPLACE TABLE LOG (\n  MSG VARCHAR(100),\n  AT TIMESTAMP_NTZ NOT NULL\n);\n\n"
        ));
        assert!(!script.contains("PRIMARY KEY"));
        assert!(!script.contains("ALTER TABLE"));
    }
}

mod dot_tests {
    use super::*;

    #[test]
    fn test_parent_child_edge() {
        let dot = to_dot(
            &parent_child_schema(),
            &Theme::default(),
            &GraphOptions::default(),
        );
        let edges: Vec<&str> = dot.lines().filter(|l| l.contains("->")).collect();

        assert_eq!(
            edges,
            vec!["  n2 -> n1 [ penwidth=\"1\" color=\"#696969\" style=\"dashed\" ]"]
        );
    }

    #[test]
    fn test_header_and_nodes() {
        let dot = to_dot(
            &parent_child_schema(),
            &Theme::default(),
            &GraphOptions::default(),
        );

        assert!(dot.starts_with(
            "digraph {\n  graph [ rankdir=\"LR\" bgcolor=\"#ffffff\" ]\n  node [ style=\"filled\" shape=\"Mrecord\" gradientangle=\"180\" ]\n"
        ));
        assert!(dot.contains("  n1 [\n"));
        assert!(dot.contains("  n2 [\n"));
        assert!(dot.contains("<b>a</b>"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_column_markers() {
        let dot = to_dot(
            &parent_child_schema(),
            &Theme::default(),
            &GraphOptions::default(),
        );

        assert!(dot.contains("<u>id</u></font>"));
        assert!(dot.contains("<i>a_id</i>*</font>"));
    }

    #[test]
    fn test_identity_and_unique_markers() {
        let mut id = column("T", "ID", &number(38, false));
        id["autoincrement"] = json!("IDENTITY START 1 INCREMENT 1");
        let catalog = snapshot_with(vec![
            (CatalogStep::Tables, vec![table("T")]),
            (
                CatalogStep::Columns,
                vec![id, column("T", "CODE", &varchar(8, true))],
            ),
            (
                CatalogStep::UniqueKeys,
                vec![json!({"table_name": "T", "column_name": "CODE", "constraint_name": "UQ_CODE"})],
            ),
        ]);
        let schema = import_metadata(&catalog, DATABASE, SCHEMA).unwrap().schema;
        let dot = to_dot(&schema, &Theme::default(), &GraphOptions::default());

        assert!(dot.contains(">id I</font>"));
        assert!(dot.contains(">code* U</font>"));
    }

    #[test]
    fn test_types_and_upper_case() {
        let options = GraphOptions {
            show_columns: true,
            show_types: true,
            upper_case: true,
        };
        let dot = to_dot(&parent_child_schema(), &Theme::default(), &options);

        assert!(dot.contains("colspan=\"2\""));
        assert!(dot.contains("<b>A</b>"));
        assert!(dot.contains(">NUMBER(38)</font>"));
    }

    #[test]
    fn test_hidden_columns() {
        let options = GraphOptions {
            show_columns: false,
            show_types: false,
            upper_case: false,
        };
        let theme = Theme::default();
        let dot = to_dot(&parent_child_schema(), &theme, &options);

        assert!(!dot.contains("align=\"left\""));
        assert!(dot.contains(&format!("fillcolor=\"{}\"", theme.fillcolor)));
        // Edges are independent of column visibility
        assert_eq!(dot.matches("->").count(), 1);
    }

    #[test]
    fn test_crow_foot_when_pk_sizes_differ() {
        let catalog = snapshot_with(vec![
            (CatalogStep::Tables, vec![table("ORDERS"), table("LINES")]),
            (
                CatalogStep::Columns,
                vec![
                    column("ORDERS", "ID", &number(38, false)),
                    column("LINES", "ORDER_ID", &number(38, false)),
                    column("LINES", "LINE_NO", &number(5, false)),
                ],
            ),
            (
                CatalogStep::PrimaryKeys,
                vec![
                    primary_key("ORDERS", "ID", "PK_ORDERS", 1),
                    primary_key("LINES", "ORDER_ID", "PK_LINES", 1),
                    primary_key("LINES", "LINE_NO", "PK_LINES", 2),
                ],
            ),
            (
                CatalogStep::ImportedKeys,
                vec![imported_key("ORDERS", "ID", "LINES", "ORDER_ID", "FK_LINES_ORDERS")],
            ),
        ]);
        let schema = import_metadata(&catalog, DATABASE, SCHEMA).unwrap().schema;
        let dot = to_dot(&schema, &Theme::default(), &GraphOptions::default());

        assert!(dot.contains(
            "  n2 -> n1 [ penwidth=\"1\" color=\"#696969\" arrowtail=\"crow\" ]\n"
        ));
    }

    #[test]
    fn test_themes_change_presentation_only() {
        let schema = parent_child_schema();
        let options = GraphOptions::default();
        let structure = |dot: &str| -> Vec<String> {
            dot.lines()
                .filter_map(|l| {
                    let l = l.trim();
                    if l.contains("->") {
                        l.split(" [").next().map(str::to_string)
                    } else if l.ends_with(" [") {
                        Some(l.to_string())
                    } else {
                        None
                    }
                })
                .collect()
        };

        let baseline = structure(&to_dot(&schema, &Theme::default(), &options));
        for builtin in BuiltinTheme::ALL {
            let dot = to_dot(&schema, &builtin.theme(), &options);
            assert_eq!(structure(&dot), baseline, "theme {}", builtin);
        }
    }

    #[test]
    fn test_html_in_names_is_escaped() {
        let catalog = snapshot_with(vec![
            (CatalogStep::Tables, vec![table("A<B>")]),
            (CatalogStep::Columns, vec![column("A<B>", "X&Y", &number(1, true))]),
        ]);
        let schema = import_metadata(&catalog, DATABASE, SCHEMA).unwrap().schema;
        let dot = to_dot(&schema, &Theme::default(), &GraphOptions::default());

        assert!(dot.contains("<b>A&lt;B&gt;</b>"));
        assert!(dot.contains(">X&amp;Y*</font>"));
    }
}

mod theme_tests {
    use super::*;

    #[test]
    fn test_parse_builtin_names() {
        assert_eq!("common-gray".parse::<BuiltinTheme>(), Ok(BuiltinTheme::CommonGray));
        assert_eq!("Blue navy".parse::<BuiltinTheme>(), Ok(BuiltinTheme::BlueNavy));
        assert_eq!("gray_box".parse::<BuiltinTheme>(), Ok(BuiltinTheme::GrayBox));
        assert!("neon".parse::<BuiltinTheme>().is_err());
    }

    #[test]
    fn test_load_theme_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dark.yaml");
        let mut theme = BuiltinTheme::BlueNavy.theme();
        theme.pencolor = "#ff0000".to_string();
        std::fs::write(&path, serde_yaml::to_string(&theme).unwrap()).unwrap();

        let loaded = Theme::load(&path).unwrap();
        assert_eq!(loaded, theme);
    }
}
