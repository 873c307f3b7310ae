//! Structural tests for layer boundaries.
//!
//! Each layer may only import from the layers beneath it. Test modules at
//! the bottom of a file are not checked.

use std::path::{Path, PathBuf};

fn rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                files.extend(rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Code lines before the first `#[cfg(test)]`, comments dropped.
fn production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .take_while(|l| !l.contains("#[cfg(test)]"))
        .map(str::trim)
        .filter(|l| !l.starts_with("//"))
        .map(String::from)
        .collect()
}

fn violations(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer);
    let mut found = Vec::new();
    for file in rs_files(&dir) {
        for line in production_lines(&file) {
            if let Some(pattern) = forbidden.iter().find(|p| line.contains(*p)) {
                found.push(format!("{}: {pattern}: {line}", file.display()));
            }
        }
    }
    found
}

#[test]
fn test_domain_is_pure() {
    let forbidden = [
        "crate::infra",
        "crate::application",
        "crate::commands",
        "crate::output",
        "std::fs",
    ];
    let found = violations("domain", &forbidden);
    assert!(
        found.is_empty(),
        "domain boundary violations:\n{}",
        found.join("\n")
    );
}

#[test]
fn test_application_does_not_reach_outwards() {
    let forbidden = [
        "crate::infra",
        "crate::commands",
        "crate::output",
        "std::fs",
    ];
    let found = violations("application", &forbidden);
    assert!(
        found.is_empty(),
        "application boundary violations:\n{}",
        found.join("\n")
    );
}

#[test]
fn test_infra_does_not_depend_on_presentation() {
    let found = violations("infra", &["crate::commands", "crate::output"]);
    assert!(
        found.is_empty(),
        "infra boundary violations:\n{}",
        found.join("\n")
    );
}
