//! Filesystem implementations of the `FragmentSource` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{FragmentFile, FragmentSource};
use crate::domain::InputError;

/// File extension of fragment files.
pub const FRAGMENT_EXTENSION: &str = "conf";

/// Every `*.conf` file directly inside a directory; the file stem is the
/// namespace.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FragmentSource for DirectorySource {
    fn fragments(&self) -> Result<Vec<FragmentFile>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("cannot read directory {}", self.dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("cannot read directory {}", self.dir.display()))?
                .path();
            let extension = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || extension != Some(FRAGMENT_EXTENSION) {
                continue;
            }
            let Some(namespace) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            files.push(read_fragment(namespace.to_string(), &path)?);
        }

        if files.is_empty() {
            return Err(InputError::NoFragments(self.dir.display().to_string()).into());
        }
        files.sort_by(|a, b| a.namespace.cmp(&b.namespace));
        tracing::debug!(count = files.len(), dir = %self.dir.display(), "fragments found");
        Ok(files)
    }
}

/// One file compiled under an explicit namespace.
pub struct SingleFileSource {
    namespace: String,
    path: PathBuf,
}

impl SingleFileSource {
    #[must_use]
    pub fn new(namespace: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }
}

impl FragmentSource for SingleFileSource {
    fn fragments(&self) -> Result<Vec<FragmentFile>> {
        Ok(vec![read_fragment(self.namespace.clone(), &self.path)?])
    }
}

fn read_fragment(namespace: String, path: &Path) -> Result<FragmentFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Ok(FragmentFile {
        namespace,
        origin: path.display().to_string(),
        text,
    })
}
