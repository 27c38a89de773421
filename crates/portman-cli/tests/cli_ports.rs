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
fn test_ports_copies_overlays_into_checkout() {
    let tmp = TempDir::new().unwrap();
    let port = tmp.path().join("external/vcpkg/ports/arcane");
    fs::create_dir_all(&port).unwrap();
    fs::write(port.join("CONTROL"), "Source: arcane\nVersion: 1.0\n").unwrap();
    fs::write(port.join("portfile.cmake"), "# build arcane\n").unwrap();

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .arg("ports")
        .assert()
        .success()
        .stderr(predicate::str::contains("arcane port: 2 files"));

    let copied = tmp.path().join("build-vcpkg/ports/arcane/CONTROL");
    assert_eq!(
        fs::read_to_string(copied).unwrap(),
        "Source: arcane\nVersion: 1.0\n"
    );

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .arg("ports")
        .assert()
        .success()
        .stderr(predicate::str::contains("arcane port: up to date"));
}

#[test]
fn test_ports_honours_directory_flags() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("project");
    fs::create_dir_all(project.join("my-ports/nova")).unwrap();
    fs::write(project.join("my-ports/nova/CONTROL"), "Source: nova\n").unwrap();

    portman_cmd(&tmp)
        .args(["ports", "--source-dir", "project", "--port-dir", "my-ports"])
        .args(["--vcpkg-dir", "deps/vcpkg"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(project.join("deps/vcpkg/ports/nova/CONTROL").is_file());
}

#[test]
fn test_ports_without_port_directory_is_a_no_op() {
    let tmp = TempDir::new().unwrap();

    portman_cmd(&tmp)
        .current_dir(tmp.path())
        .arg("ports")
        .assert()
        .success()
        .stderr(predicate::str::contains("0 ports"));

    assert!(!tmp.path().join("build-vcpkg").exists());
}
