//! Black-box tests for the sandbox runner binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn sbx() -> Command {
    Command::cargo_bin("sbx").expect("sbx binary builds")
}

#[test]
fn test_executes_task_and_writes_result() {
    let temp = TempDir::new().unwrap();
    let task_path = temp.path().join("task_abc.json");
    fs::write(
        &task_path,
        r#"{"task_id": "abc", "tool_code": "<tool code=\"run_shell\">echo from-sandbox</tool>"}"#,
    )
    .unwrap();

    sbx().current_dir(temp.path()).arg(&task_path).assert().success();

    let result = fs::read_to_string(temp.path().join("result_abc.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();

    assert_eq!(parsed["task_id"], "abc");
    let log = parsed["execution_log"].as_str().unwrap();
    assert!(log.contains("--- Tool Execution: run_shell ---"));
    assert!(log.contains("from-sandbox"));
}

#[test]
fn test_no_tool_tags_substitutes_notice() {
    let temp = TempDir::new().unwrap();
    let task_path = temp.path().join("task_x9.json");
    fs::write(&task_path, r#"{"task_id": "x9", "tool_code": "just prose"}"#).unwrap();

    sbx().current_dir(temp.path()).arg(&task_path).assert().success();

    let result = fs::read_to_string(temp.path().join("result_x9.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();

    assert_eq!(
        parsed["execution_log"],
        serde_json::json!("No tool tags found in the submitted code.")
    );
}

#[test]
fn test_missing_task_file_fails() {
    let temp = TempDir::new().unwrap();

    sbx()
        .current_dir(temp.path())
        .arg("task_missing.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read task file"));
}

#[test]
fn test_malformed_descriptor_fails() {
    let temp = TempDir::new().unwrap();
    let task_path = temp.path().join("task_bad.json");
    fs::write(&task_path, "not json at all").unwrap();

    sbx()
        .current_dir(temp.path())
        .arg(&task_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse task descriptor"));
}

#[test]
fn test_empty_fields_rejected() {
    let temp = TempDir::new().unwrap();
    let task_path = temp.path().join("task_empty.json");
    fs::write(&task_path, r#"{"task_id": "", "tool_code": ""}"#).unwrap();

    sbx()
        .current_dir(temp.path())
        .arg(&task_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing task_id or tool_code"));
}
