use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn portman_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("portman").unwrap();
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_plan_without_manifest_is_empty() {
    let tmp = TempDir::new().unwrap();

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no packages requested"));
}

#[test]
fn test_plan_json_without_packages() {
    let tmp = TempDir::new().unwrap();

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["plan", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"install_order\": []"));
}

#[test]
fn test_plan_rejects_malformed_manifest() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("portman.toml"), "[project\npackages = 3\n").unwrap();

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_plan_rejects_unknown_manifest_keys() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("portman.toml"),
        "[project]\npackages = [\"zlib\"]\ncolour = \"blue\"\n",
    )
    .unwrap();

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn test_plan_rejects_empty_feature_list() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("portman.toml"),
        "[project]\npackages = [\"zlib\", \"curl[]\"]\n",
    )
    .unwrap();

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty feature list"));
}

#[test]
fn test_plan_needs_bootstrapped_vcpkg() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("portman.toml"),
        "[project]\npackages = [\"zlib\"]\n",
    )
    .unwrap();

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no vcpkg executable"));
}

#[test]
fn test_install_skip_bootstrap_needs_vcpkg() {
    let tmp = TempDir::new().unwrap();

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["install", "--skip-bootstrap", "--skip-ports"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no vcpkg executable"));
}
