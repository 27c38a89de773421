use std::path::Path;

use portman_util::fs::{absolutize, copy_dir_updating, ensure_dir};
use tempfile::TempDir;

#[test]
fn test_ensure_dir_creates_nested() {
    let tmp = TempDir::new().unwrap();
    let deep = tmp.path().join("x").join("y").join("z");
    assert!(!deep.exists());
    ensure_dir(&deep).unwrap();
    assert!(deep.is_dir());
}

#[test]
fn test_ensure_dir_idempotent() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("already");
    std::fs::create_dir(&dir).unwrap();
    ensure_dir(&dir).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn test_absolutize_relative_and_absolute() {
    let tmp = TempDir::new().unwrap();
    let rel = absolutize(tmp.path(), Path::new("build-vcpkg"));
    assert_eq!(rel, tmp.path().join("build-vcpkg"));
    let abs = absolutize(Path::new("/ignored"), tmp.path());
    assert_eq!(abs, tmp.path());
}

#[test]
fn test_copy_dir_updating_copies_tree() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    std::fs::create_dir_all(src.join("patches")).unwrap();
    std::fs::write(src.join("CONTROL"), "Source: foo\n").unwrap();
    std::fs::write(src.join("patches").join("fix.patch"), "diff").unwrap();

    let dest = tmp.path().join("dest");
    let copied = copy_dir_updating(&src, &dest).unwrap();
    assert_eq!(copied, 2);
    assert_eq!(
        std::fs::read_to_string(dest.join("CONTROL")).unwrap(),
        "Source: foo\n"
    );
    assert!(dest.join("patches").join("fix.patch").is_file());
}

#[test]
fn test_copy_dir_updating_skips_up_to_date_files() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(src.join("CONTROL"), "Source: foo\n").unwrap();

    let dest = tmp.path().join("dest");
    copy_dir_updating(&src, &dest).unwrap();
    let second = copy_dir_updating(&src, &dest).unwrap();
    assert_eq!(second, 0);
}
