//! The `tgscaffold` binary.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::{COMPUTE_VARIABLES, Workspace};

fn tgscaffold(ws: &Workspace) -> Command {
    let mut cmd = Command::cargo_bin("tgscaffold").unwrap();
    cmd.current_dir(ws.root())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("GITHUB_OAUTH_TOKEN");
    cmd
}

#[test]
fn test_inputs_json() {
    let ws = Workspace::new();
    ws.write_module(&[("variables.tf", COMPUTE_VARIABLES)]);

    let output = tgscaffold(&ws).args(["inputs", "module", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["required"][0]["Name"], "instance_count");
    assert_eq!(parsed["required"][0]["Type"], "number");
    assert_eq!(parsed["optional"][0]["Name"], "region");
    assert_eq!(parsed["optional"][0]["DefaultValue"], "\"us-east-1\"");
}

#[test]
fn test_inputs_text() {
    let ws = Workspace::new();
    ws.write_module(&[("variables.tf", COMPUTE_VARIABLES)]);

    tgscaffold(&ws)
        .args(["inputs", "module"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Required inputs (1)"))
        .stdout(predicate::str::contains("Optional inputs (1)"))
        .stdout(predicate::str::contains("default: \"us-east-1\""));
}

#[test]
fn test_inputs_missing_directory_fails() {
    let ws = Workspace::new();

    tgscaffold(&ws)
        .args(["inputs", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_scaffold_local_module() {
    let ws = Workspace::new();
    ws.write_module(&[("variables.tf", COMPUTE_VARIABLES)]);

    tgscaffold(&ws)
        .args(["scaffold", "module", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated terragrunt.hcl"))
        .stdout(predicate::str::contains("Source file://"));

    let generated = ws.read_output("terragrunt.hcl");
    assert!(generated.contains("source = \"file://"));
    assert!(generated.contains("instance_count = null  # TODO: fill in value"));
    assert!(generated.contains("# region = \"us-east-1\""));
}

#[test]
fn test_scaffold_rejects_malformed_var() {
    let ws = Workspace::new();
    ws.write_module(&[("variables.tf", COMPUTE_VARIABLES)]);

    tgscaffold(&ws)
        .args(["scaffold", "module", "--var", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid variable novalue"));

    assert!(!ws.root().join("terragrunt.hcl").exists());
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let ws = Workspace::new();

    tgscaffold(&ws)
        .args(["--verbose", "--quiet", "inputs"])
        .assert()
        .failure();
}
