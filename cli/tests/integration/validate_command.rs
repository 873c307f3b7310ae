//! Integration tests for `kfo validate`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn kfo() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kfo"));
    cmd.env_remove("KFO_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn fragment_file(text: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("fragment.conf");
    std::fs::write(&path, text).expect("write fixture");
    (dir, path)
}

#[test]
fn test_validate_accepts_clean_fragment() {
    let (_dir, path) = fragment_file("<filter kube.**>\n  @type record_transformer\n</filter>\n");
    kfo()
        .args(["--no-color", "validate", "--namespace", "web"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("<filter kube.**>"))
        .stderr(predicate::str::contains("namespace 'web' accepted"));
}

#[test]
fn test_validate_prints_trailer_for_unused_share() {
    let (_dir, path) = fragment_file("<store>\n  @type share\n  with_namespace api\n</store>\n");
    kfo()
        .args(["validate", "--namespace", "web"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("@type null"))
        .stdout(predicate::str::contains("<label @bridge-web__api>"));
}

#[test]
fn test_validate_rejects_exec() {
    let text = "<match **>\n  @type exec\n  command touch /tmp/x\n</match>\n";
    let (_dir, path) = fragment_file(text);
    kfo()
        .args(["validate", "--namespace", "web"])
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot use '@type exec' in <match>"));
}

#[test]
fn test_validate_rejects_tag_prefix_rewrite() {
    let (_dir, path) =
        fragment_file("<filter **>\n  @type fields_parser\n  add_tag_prefix other\n</filter>\n");
    kfo()
        .args(["validate", "--namespace", "web"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot modify tags using the plugin fields_parser"));
}

#[test]
fn test_validate_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    kfo()
        .args(["validate", "--namespace", "web"])
        .arg(dir.path().join("absent.conf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_validate_rejects_invalid_namespace() {
    let (_dir, path) = fragment_file("");
    kfo()
        .args(["validate", "--namespace", "Web"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid namespace 'Web'"));
}
