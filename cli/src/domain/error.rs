//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors in `kfo.yaml` values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("deployment_id must not be empty")]
    EmptyDeploymentId,

    #[error("Invalid buffer_mount_folder '{0}': must be a relative path without '..'")]
    InvalidMountFolder(String),

    #[error("Invalid namespace '{0}' in namespaces: must match ^[a-z0-9]([-a-z0-9]{{0,61}}[a-z0-9])?$")]
    InvalidNamespace(String),
}

// ── Input errors ──────────────────────────────────────────────────────────────

/// Errors in the set of fragments handed to a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("No *.conf fragments found in {0}")]
    NoFragments(String),

    #[error("Invalid namespace '{namespace}' for {origin}: must match ^[a-z0-9]([-a-z0-9]{{0,61}}[a-z0-9])?$")]
    InvalidNamespace { namespace: String, origin: String },

    #[error("Namespace '{namespace}' is given more than once ({origin})")]
    DuplicateNamespace { namespace: String, origin: String },
}
