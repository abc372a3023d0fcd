//! Integration tests that verify --json output matches the published JSON schemas.

use jsonschema::Validator;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Command;

fn erd_viewer_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_erd-viewer"))
}

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sales.yaml")
}

fn load_schema(name: &str) -> Validator {
    let output = erd_viewer_bin()
        .args(["json-schema", name])
        .output()
        .expect("Failed to run json-schema");
    assert!(output.status.success(), "json-schema {} failed", name);

    let schema: Value = serde_json::from_slice(&output.stdout).expect("Invalid schema JSON");
    Validator::new(&schema).expect("Failed to compile schema")
}

fn validate_json_output(output: &std::process::Output, schema_name: &str) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "Command failed with stderr: {}",
        stderr
    );

    let json: Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {}\nOutput: {}", e, stdout));

    let schema = load_schema(schema_name);
    if let Err(error) = schema.validate(&json) {
        panic!(
            "JSON output doesn't match {} schema:\n  - {}: {}\n\nOutput was:\n{}",
            schema_name,
            error.instance_path(),
            error,
            serde_json::to_string_pretty(&json).unwrap()
        );
    }
    json
}

fn stats_json(schema: &str) -> std::process::Output {
    erd_viewer_bin()
        .arg("stats")
        .arg("-c")
        .arg(fixture())
        .args(["--no-cache", "-d", "SALES", "-s", schema, "--json"])
        .output()
        .expect("Failed to run stats")
}

#[test]
fn test_schema_names_listed() {
    let output = erd_viewer_bin().arg("json-schema").output().unwrap();
    assert!(output.status.success());

    let out = String::from_utf8_lossy(&output.stdout);
    assert!(out.contains("stats"));
    assert!(out.contains("diagnostics"));
}

#[test]
fn test_unknown_schema_name_fails() {
    let output = erd_viewer_bin()
        .args(["json-schema", "nope"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_stats_json_matches_schema() {
    let json = validate_json_output(&stats_json("PUBLIC"), "stats");
    assert_eq!(json["stats"]["tables"], 2);
}

#[test]
fn test_stats_json_with_recovered_steps_matches_schema() {
    let json = validate_json_output(&stats_json("STAGING"), "stats");

    let recovered: Vec<&Value> = json["diagnostics"]["steps"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["status"] == "recovered")
        .collect();
    assert_eq!(recovered.len(), 4);
    assert!(recovered[0]["reason"].is_string());
}

#[test]
fn test_diagnostics_schema_accepts_stats_diagnostics() {
    let output = stats_json("PUBLIC");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let schema = load_schema("diagnostics");
    assert!(schema.is_valid(&json["diagnostics"]));
}
