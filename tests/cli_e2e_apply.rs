//! End-to-end tests for `apply`, `completions`, and exit codes.

#[allow(dead_code)]
mod common;
use common::prelude::*;

const BATCH: &str = r#"
- kind: resource
  name: web
  type: systemd:httpd
  clone:
    interleave: true
- kind: colocation
  resource: [web-clone, vip1]
- kind: location
  resource: vip1
  node: control2
  score: "200"
"#;

const BATCH_WITH_FAILURE: &str = r#"
- kind: location
  resource: ghost
  node: control1
- kind: property
  params: stonith-enabled=false
"#;

#[test]
fn test_apply_runs_requests_in_order() {
    let fixture = CibFixture::new(documents::CLUSTER).with_file("requests.yaml", BATCH);
    let output = fixture
        .command()
        .args(["apply", "--file", "requests.yaml"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let reports: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|report| report["changed"] == true));
    assert_eq!(reports[1]["kind"], "colocation");

    fixture
        .command()
        .args(["apply", "--file", "requests.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""changed":true"#).not());
}

#[test]
fn test_apply_stops_at_first_failure() {
    let fixture =
        CibFixture::new(documents::CLUSTER).with_file("requests.yaml", BATCH_WITH_FAILURE);
    fixture
        .command()
        .args(["apply", "--file", "requests.yaml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no such resource: ghost"))
        .stdout(predicate::str::contains("property").not())
        .stderr(predicate::str::contains("1 of 2 requests failed"));
    assert!(!fixture.cib().contains("stonith-enabled"));
}

#[test]
fn test_apply_keep_going() {
    let fixture =
        CibFixture::new(documents::CLUSTER).with_file("requests.yaml", BATCH_WITH_FAILURE);
    fixture
        .command()
        .args(["apply", "--file", "requests.yaml", "--keep-going"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""kind":"property""#));
    assert!(fixture.cib().contains("stonith-enabled"));
}

#[test]
fn test_apply_unknown_kind() {
    let fixture =
        CibFixture::new(documents::CLUSTER).with_file("requests.yaml", "- kind: fencing\n");
    fixture
        .command()
        .args(["apply", "--file", "requests.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse request file"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("cib-reconcile");
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("cib-reconcile"))
        .stdout(predicate::str::contains("colocation"))
        .stdout(predicate::str::contains("order-set"));
}

#[test]
fn test_exit_code_help_and_version() {
    cargo_bin_cmd!("cib-reconcile").arg("--help").assert().code(0);
    cargo_bin_cmd!("cib-reconcile").arg("--version").assert().code(0);
}

#[test]
fn test_exit_code_usage_error() {
    cargo_bin_cmd!("cib-reconcile")
        .args(["location", "--resource", "vip1"])
        .assert()
        .code(2);
}

#[test]
fn test_log_level_debug_goes_to_stderr() {
    let fixture = CibFixture::new(documents::CLUSTER);
    fixture
        .command()
        .args(["--log-level", "debug", "property", "--params", "stonith-enabled=false"])
        .assert()
        .success()
        .stderr(predicate::str::contains("committed scope crm_config"));
}
