//! Tests for the JSON document printed by the `callgraph` binary.

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn run_callgraph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_callgraph"))
        .args(args)
        .current_dir(testdata_path())
        .output()
        .expect("should run callgraph binary")
}

#[test]
fn test_document_shape() {
    let output = run_callgraph(&["api"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let doc: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let top = doc.as_object().unwrap();
    let mut keys: Vec<_> = top.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["edges", "nodes"]);

    for node in doc["nodes"].as_array().unwrap() {
        let obj = node.as_object().unwrap();
        assert!(obj["id"].is_string());
        assert_eq!(obj["id"], obj["name"]);
        assert!(obj["args"].is_array());
        assert!(obj["returns"].is_array());
        if let Some(endpoint) = obj.get("endpoint") {
            assert!(!endpoint.as_str().unwrap().is_empty());
        }
    }

    for edge in doc["edges"].as_array().unwrap() {
        let obj = edge.as_object().unwrap();
        assert!(obj["source"].is_string());
        assert!(obj["target"].is_string());
        assert!(obj["line"].as_u64().unwrap() >= 1);
        assert!(obj["file"].as_str().unwrap().ends_with(".go"));
    }
}

#[test]
fn test_endpoint_omitted_on_plain_edges() {
    let output = run_callgraph(&["api/handlers.go"]);
    assert!(output.status.success());

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &doc["edges"][0];
    assert_eq!(first["source"], "List");
    assert_eq!(first["target"], "FindAll");
    assert_eq!(first["line"], 4);
    assert_eq!(first["file"], "api/handlers.go");
    assert!(first.get("endpoint").is_none());
}

#[test]
fn test_pretty_flag() {
    let compact = run_callgraph(&["api/handlers.go"]);
    let pretty = run_callgraph(&["--pretty", "api/handlers.go"]);
    assert!(pretty.status.success());

    assert!(!compact.stdout.contains(&b'\n'));
    assert!(pretty.stdout.contains(&b'\n'));

    let a: Value = serde_json::from_slice(&compact.stdout).unwrap();
    let b: Value = serde_json::from_slice(&pretty.stdout).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_test_file_only_input_gives_empty_graph() {
    let output = run_callgraph(&["api/handlers_test.go"]);
    assert!(output.status.success());
    assert_eq!(output.stdout, br#"{"nodes":[],"edges":[]}"#);
}

#[test]
fn test_no_arguments_is_a_usage_error() {
    let output = run_callgraph(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_parse_error_produces_no_output() {
    let output = run_callgraph(&["api/handlers.go", "invalid/broken.go"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.go"), "stderr: {}", stderr);
}

#[test]
fn test_exclude_flag() {
    let output = run_callgraph(&["--exclude", "**/main.go", "api"]);
    assert!(output.status.success());

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<_> = doc["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"List"));
    assert!(!ids.contains(&"main"));
}
