//! Domain types and validators for kfo configuration.
//!
//! Pure functions only. No I/O, no filesystem access.

use std::collections::BTreeMap;

use anyhow::Result;
use kfo_core::{Tenant, TenantPolicy, is_valid_namespace};
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `kfo.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KfoConfig {
    /// Identifier of this agent deployment, part of every buffer file name.
    pub deployment_id: String,
    /// Folder under `/var/log` that holds buffer files.
    pub buffer_mount_folder: Option<String>,
    /// Policy for namespaces without an entry in `namespaces`.
    pub policy: TenantPolicy,
    /// Per-namespace policy overrides.
    pub namespaces: BTreeMap<String, TenantPolicy>,
}

impl Default for KfoConfig {
    fn default() -> Self {
        Self {
            deployment_id: default_deployment_id(),
            buffer_mount_folder: None,
            policy: TenantPolicy::default(),
            namespaces: BTreeMap::new(),
        }
    }
}

fn default_deployment_id() -> String {
    "default".to_string()
}

impl KfoConfig {
    /// Policy for `namespace`, falling back to the global one.
    #[must_use]
    pub fn policy_for(&self, namespace: &str) -> TenantPolicy {
        self.namespaces
            .get(namespace)
            .copied()
            .unwrap_or(self.policy)
    }

    /// Builds the tenant settings for `namespace`.
    #[must_use]
    pub fn tenant(&self, namespace: &str) -> Tenant {
        let tenant = Tenant::new(namespace, self.deployment_id.as_str())
            .with_policy(self.policy_for(namespace));
        match self.buffer_mount_folder.as_deref() {
            Some(folder) if !folder.is_empty() => tenant.with_buffer_mount_folder(folder),
            _ => tenant,
        }
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.deployment_id.trim().is_empty() {
            return Err(ConfigError::EmptyDeploymentId.into());
        }
        let folder = self.buffer_mount_folder.as_deref().unwrap_or_default();
        if !folder.is_empty() {
            validate_mount_folder(folder)?;
        }
        if let Some(ns) = self.namespaces.keys().find(|ns| !is_valid_namespace(ns)) {
            return Err(ConfigError::InvalidNamespace(ns.clone()).into());
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a buffer mount folder: relative, no `..` or empty segments.
///
/// # Errors
///
/// Returns an error if the folder could escape `/var/log`.
pub fn validate_mount_folder(folder: &str) -> Result<()> {
    let escapes = folder.starts_with('/')
        || folder.contains('\\')
        || folder
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if escapes {
        return Err(ConfigError::InvalidMountFolder(folder.to_string()).into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
