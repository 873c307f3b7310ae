//! Compile service wired to the real filesystem adapters.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use kfo_cli::application::services::compile_service::compile_fragments;
use kfo_cli::infra::{DirectorySource, SingleFileSource, YamlConfigStore};
use tempfile::TempDir;

fn config_file(dir: &TempDir, yaml: &str) -> PathBuf {
    let path = dir.path().join("kfo.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn test_directory_run_applies_config() {
    let dir = TempDir::new().unwrap();
    let fragment = "<match **>\n  @type s3\n  <buffer>\n    @type file\n    path /data/buf\n  \
                    </buffer>\n</match>\n";
    std::fs::write(dir.path().join("web.conf"), fragment).unwrap();
    let cfg = TempDir::new().unwrap();
    let store = YamlConfigStore::new(Some(config_file(&cfg, "deployment_id: blue\n")));

    let report = compile_fragments(&store, &DirectorySource::new(dir.path())).unwrap();

    assert!(report.is_success());
    let text = report.compilation.render();
    assert!(text.contains("path /var/log/kfo-blue-web-"), "got: {text}");
    assert!(!text.contains("/data/buf"), "got: {text}");
}

#[test]
fn test_single_file_run_reports_rejection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fragment.conf");
    std::fs::write(&path, "<match **>\n  @type stdout\n</match>\n").unwrap();
    let store = YamlConfigStore::new(Some(config_file(&dir, "deployment_id: blue\n")));

    let report = compile_fragments(&store, &SingleFileSource::new("web", &path)).unwrap();

    assert_eq!(report.rejected_count(), 1);
    let err = report.compilation.rejected().next().unwrap();
    assert_eq!(err.namespace, "web");
    assert_eq!(err.processor, "destinations");
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fragment.conf");
    std::fs::write(&path, "").unwrap();
    let store = YamlConfigStore::new(Some(dir.path().join("absent.yaml")));

    let err = compile_fragments(&store, &SingleFileSource::new("web", &path)).unwrap_err();
    assert!(format!("{err:#}").contains("cannot read"), "got: {err:#}");
}
