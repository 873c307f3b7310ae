//! Integration tests for `kfo compile`.
//!
//! Every test removes `KFO_CONFIG` from the environment and passes any
//! configuration explicitly.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn kfo() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kfo"));
    cmd.env_remove("KFO_CONFIG").env_remove("RUST_LOG");
    cmd
}

const EXPORTER: &str = "\
<match kube.team-a.**>
  @type copy
  <store>
    @type share
    with_namespace team-b
  </store>
</match>
";

const IMPORTER: &str = "\
<label @$from(team-a)>
  <match **>
    @type elasticsearch
    host es.team-b
  </match>
</label>
";

fn write(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).expect("write fixture");
}

fn fragments(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (name, text) in files {
        write(dir.path(), name, text);
    }
    dir
}

// ---------------------------------------------------------------------------
// Successful runs
// ---------------------------------------------------------------------------

#[test]
fn test_compile_shared_namespaces_to_stdout() {
    let dir = fragments(&[("team-a.conf", EXPORTER), ("team-b.conf", IMPORTER)]);
    kfo()
        .args(["--no-color", "compile", "--input"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("@type relabel"))
        .stdout(predicate::str::contains("@label @bridge-team-a__team-b"))
        .stdout(predicate::str::contains("<label @bridge-team-a__team-b>"))
        .stdout(predicate::str::contains("@type rewrite_tag_filter"))
        .stdout(predicate::str::contains("tag kube.team-b.${tag_parts[2]}.${tag_parts[3]}"))
        .stderr(predicate::str::contains("namespace 'team-a' accepted"))
        .stderr(predicate::str::contains("namespace 'team-b' accepted"));
}

#[test]
fn test_compile_writes_output_file() {
    let dir = fragments(&[("team-a.conf", EXPORTER)]);
    let out = TempDir::new().unwrap();
    let target = out.path().join("fluent.conf");

    kfo()
        .args(["--no-color", "compile", "--input"])
        .arg(dir.path())
        .arg("--output")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("placeholder label"));

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.contains("@type null"), "got: {written}");
    assert!(
        written.contains("<label @bridge-team-a__team-b>"),
        "got: {written}"
    );
}

#[test]
fn test_compile_is_deterministic() {
    let dir = fragments(&[("team-a.conf", EXPORTER), ("team-b.conf", IMPORTER)]);
    let run = || {
        kfo()
            .args(["--quiet", "compile", "--input"])
            .arg(dir.path())
            .output()
            .expect("run kfo")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_compile_quiet_suppresses_status_lines() {
    let dir = fragments(&[("team-a.conf", EXPORTER)]);
    kfo()
        .args(["--quiet", "compile", "--input"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_compile_ignores_non_conf_files() {
    let dir = fragments(&[("team-a.conf", EXPORTER), ("README.md", "<not a fragment")]);
    kfo()
        .args(["compile", "--input"])
        .arg(dir.path())
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_compile_uses_config_file_for_buffer_paths() {
    let dir = fragments(&[(
        "team-a.conf",
        "<match **>\n  @type s3\n  buffer_path /tmp/s3\n</match>\n",
    )]);
    let cfg = TempDir::new().unwrap();
    let cfg_path = cfg.path().join("kfo.yaml");
    let yaml = "deployment_id: prod.eu\nbuffer_mount_folder: kfo\n";
    std::fs::write(&cfg_path, yaml).unwrap();

    kfo()
        .arg("--config")
        .arg(&cfg_path)
        .args(["compile", "--input"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("buffer_path /var/log/kfo/kfo-prod-eu-team-a-"))
        .stdout(predicate::str::contains("/tmp/s3").not());
}

#[test]
fn test_compile_reads_config_from_env() {
    let dir = fragments(&[(
        "team-a.conf",
        "<match **>\n  @type file\n  path /var/log/out\n</match>\n",
    )]);
    let cfg = TempDir::new().unwrap();
    let cfg_path = cfg.path().join("kfo.yaml");
    std::fs::write(&cfg_path, "namespaces:\n  team-a:\n    allow_file: true\n").unwrap();

    kfo()
        .env("KFO_CONFIG", &cfg_path)
        .args(["compile", "--input"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("@type file"));
}

#[test]
fn test_compile_rejects_invalid_config() {
    let dir = fragments(&[("team-a.conf", EXPORTER)]);
    let cfg = TempDir::new().unwrap();
    let cfg_path = cfg.path().join("kfo.yaml");
    std::fs::write(&cfg_path, "buffer_mount_folder: ../etc\n").unwrap();

    kfo()
        .arg("--config")
        .arg(&cfg_path)
        .args(["compile", "--input"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid buffer_mount_folder"));
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[test]
fn test_compile_reports_rejected_namespace_and_keeps_others() {
    let evil = "<source>\n  @type tail\n  path /etc/shadow\n</source>\n";
    let dir = fragments(&[("team-a.conf", EXPORTER), ("evil.conf", evil)]);
    kfo()
        .args(["--no-color", "compile", "--input"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("<match kube.team-a.**>"))
        .stdout(predicate::str::contains("/etc/shadow").not())
        .stderr(predicate::str::contains(
            "namespace 'evil' rejected by destinations (process): cannot use <source> directive with '@type tail'",
        ))
        .stderr(predicate::str::contains("1 namespace(s) rejected"));
}

#[test]
fn test_compile_reports_unparsable_fragment() {
    let dir = fragments(&[
        ("team-a.conf", EXPORTER),
        ("team-b.conf", "<label @$from(team-a)>\n"),
    ]);
    kfo()
        .args(["compile", "--input"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("@type null"))
        .stderr(predicate::str::contains("namespace 'team-b' rejected"))
        .stderr(predicate::str::contains("never closed"));
}

#[test]
fn test_compile_rejects_invalid_namespace_file_name() {
    let dir = fragments(&[("Team_A.conf", EXPORTER)]);
    kfo()
        .args(["compile", "--input"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid namespace 'Team_A'"));
}

#[test]
fn test_compile_empty_directory_fails() {
    let dir = TempDir::new().unwrap();
    kfo()
        .args(["compile", "--input"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No *.conf fragments"));
}
