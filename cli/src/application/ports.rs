//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use anyhow::Result;

use crate::domain::KfoConfig;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Raw configuration text submitted for one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFile {
    /// Namespace the fragment belongs to.
    pub namespace: String,
    /// Where the text came from, for messages.
    pub origin: String,
    pub text: String,
}

// ── Port Traits ───────────────────────────────────────────────────────────────

/// Loads the run configuration.
pub trait ConfigStore {
    /// Returns the stored configuration, or the default when none exists.
    fn load(&self) -> Result<KfoConfig>;
}

/// Supplies the fragments of one run.
pub trait FragmentSource {
    /// Returns every fragment, sorted by namespace.
    fn fragments(&self) -> Result<Vec<FragmentFile>>;
}
