//! End-to-end tests for `stackguard check` and the report renderers.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use stackguard_test_util::normalize_nondeterministic;
use std::path::Path;
use tempfile::TempDir;

const SCENARIO_CONFIG: &str = r#"{
  "required-tags": { "enforcementLevel": "advisory", "requiredTags": ["Department"] },
  "max-cpu": { "enforcementLevel": "mandatory", "maxCpu": 64 }
}"#;

const SCENARIO_RESOURCES: &str = r#"[
  { "type": "ecs:Cluster", "name": "main", "properties": { "tags": {} } },
  { "type": "ecs:TaskDefinition", "name": "app", "properties": { "cpu": "256" } }
]"#;

#[allow(deprecated)]
fn stackguard_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stackguard").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn workspace(config: Option<(&str, &str)>, resources: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    if let Some((name, text)) = config {
        std::fs::write(tmp.path().join(name), text).unwrap();
    }
    std::fs::write(tmp.path().join("resources.json"), resources).unwrap();
    tmp
}

fn read_report(dir: &Path) -> Value {
    let text =
        std::fs::read_to_string(dir.join("artifacts/stackguard/report.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn scenario_fails_with_exit_code_two() {
    let tmp = workspace(Some(("stackguard.json", SCENARIO_CONFIG)), SCENARIO_RESOURCES);

    stackguard_cmd(tmp.path()).arg("check").assert().code(2);

    let report = normalize_nondeterministic(read_report(tmp.path()));
    assert_eq!(report["schema"], "stackguard.report.v1");
    assert_eq!(report["tool"]["version"], "__VERSION__");
    assert_eq!(report["verdict"]["status"], "fail");
    assert_eq!(report["verdict"]["counts"]["advisory"], 1);
    assert_eq!(report["verdict"]["counts"]["mandatory"], 1);

    let violations = report["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0]["policy_name"], "required-tags");
    assert_eq!(violations[0]["enforcement_level"], "advisory");
    assert_eq!(violations[0]["data"]["tag"], "Department");
    assert_eq!(violations[1]["policy_name"], "max-cpu");
    assert_eq!(violations[1]["enforcement_level"], "mandatory");
    assert_eq!(violations[1]["data"]["value"], 256);
    assert_eq!(violations[1]["data"]["limit"], 64);
}

#[test]
fn advisory_only_passes_with_exit_code_zero() {
    let config = r#"{ "all": "advisory", "required-tags": { "requiredTags": ["Department"] }, "max-cpu": { "maxCpu": 64 } }"#;
    let tmp = workspace(Some(("stackguard.json", config)), SCENARIO_RESOURCES);

    stackguard_cmd(tmp.path()).arg("check").assert().success();

    let report = read_report(tmp.path());
    assert_eq!(report["verdict"]["status"], "warn");
}

#[test]
fn enforcement_level_override_applies() {
    let tmp = workspace(Some(("stackguard.json", SCENARIO_CONFIG)), SCENARIO_RESOURCES);

    stackguard_cmd(tmp.path())
        .args(["--enforcement-level", "disabled", "check"])
        .assert()
        .success();

    let report = read_report(tmp.path());
    assert_eq!(report["verdict"]["status"], "pass");
    assert_eq!(report["data"]["policies_enabled"], 0);
}

#[test]
fn toml_config_by_extension() {
    let config = "[max-cpu]\nmaxMemory = 512\n";
    let resources = r#"{"type": "aws:ecs/taskDefinition:TaskDefinition", "name": "web", "properties": {"memory": "1024"}}"#;
    let tmp = workspace(Some(("policy.toml", config)), resources);

    stackguard_cmd(tmp.path())
        .args(["--config", "policy.toml", "check"])
        .assert()
        .code(2);

    let report = read_report(tmp.path());
    assert_eq!(report["violations"][0]["code"], "limit_exceeded");
    assert_eq!(
        report["violations"][0]["urn"],
        "urn:stackguard::aws:ecs/taskDefinition:TaskDefinition::web#0"
    );
}

#[test]
fn missing_config_uses_defaults() {
    let tmp = workspace(None, SCENARIO_RESOURCES);

    stackguard_cmd(tmp.path()).arg("check").assert().success();

    let report = read_report(tmp.path());
    assert_eq!(report["verdict"]["status"], "pass");
    assert_eq!(report["data"]["resources_scanned"], 2);
}

#[test]
fn resources_from_stdin() {
    let tmp = workspace(Some(("stackguard.json", SCENARIO_CONFIG)), "");

    stackguard_cmd(tmp.path())
        .args(["check", "--resources", "-"])
        .write_stdin(SCENARIO_RESOURCES)
        .assert()
        .code(2);
}

#[test]
fn invalid_config_writes_runtime_error_report() {
    let config = r#"{ "max-cpu": { "maxCpu": "lots" } }"#;
    let tmp = workspace(Some(("stackguard.json", config)), SCENARIO_RESOURCES);

    stackguard_cmd(tmp.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("maxCpu"));

    let report = read_report(tmp.path());
    assert_eq!(report["verdict"]["status"], "fail");
    assert_eq!(report["violations"][0]["policy_name"], "tool.runtime");
    assert_eq!(report["violations"][0]["code"], "runtime_error");
}

#[test]
fn markdown_and_annotations_render_from_report() {
    let tmp = workspace(Some(("stackguard.json", SCENARIO_CONFIG)), SCENARIO_RESOURCES);

    stackguard_cmd(tmp.path())
        .args(["check", "--write-markdown"])
        .assert()
        .code(2);

    let md = std::fs::read_to_string(tmp.path().join("artifacts/stackguard/comment.md")).unwrap();
    assert!(md.contains("# Stackguard report"));
    assert!(md.contains("Verdict: **FAIL**"));

    stackguard_cmd(tmp.path())
        .arg("md")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ADVISORY] `required-tags`"));

    stackguard_cmd(tmp.path())
        .arg("annotations")
        .assert()
        .success()
        .stdout(predicate::str::contains("::warning title=required-tags::"))
        .stdout(predicate::str::contains("::error title=max-cpu::"));
}

#[test]
fn explain_known_and_unknown() {
    let tmp = TempDir::new().unwrap();

    stackguard_cmd(tmp.path())
        .args(["explain", "missing_tag"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remediation"));

    stackguard_cmd(tmp.path())
        .args(["explain", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Available policies:"));
}

#[test]
fn policies_lists_builtins() {
    let tmp = TempDir::new().unwrap();

    stackguard_cmd(tmp.path())
        .arg("policies")
        .assert()
        .success()
        .stdout(predicate::str::contains("required-tags [advisory]"))
        .stdout(predicate::str::contains("max-cpu [mandatory]"));

    let output = stackguard_cmd(tmp.path())
        .args(["policies", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let listings: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listings[1]["config_schema"]["properties"]["maxCpu"]["minimum"], 1);
}
