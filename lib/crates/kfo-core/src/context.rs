//! Per-tenant and per-run state handed to processors.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Policy flags granted to one tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantPolicy {
    /// Permits `@type file` sinks.
    pub allow_file: bool,
    /// Permits `@type mounted-file` in `match`/`store`/`filter`.
    pub allow_mounted_file: bool,
}

/// Identity and settings of one tenant for one compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub namespace: String,
    pub deployment_id: String,
    /// Folder under `/var/log` where buffers go; `None` means `/var/log` itself.
    pub buffer_mount_folder: Option<String>,
    pub policy: TenantPolicy,
}

impl Tenant {
    #[must_use]
    pub fn new(namespace: impl Into<String>, deployment_id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            deployment_id: deployment_id.into(),
            buffer_mount_folder: None,
            policy: TenantPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: TenantPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_buffer_mount_folder(mut self, folder: impl Into<String>) -> Self {
        self.buffer_mount_folder = Some(folder.into());
        self
    }
}

/// Prefix of every bridge label. Tenants may not declare or target it.
pub const BRIDGE_LABEL_PREFIX: &str = "@bridge-";

/// Cross-namespace channel from `source` to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bridge {
    pub source: String,
    pub destination: String,
}

impl Bridge {
    #[must_use]
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Label identifier, e.g. `@bridge-team-a__team-b`.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{BRIDGE_LABEL_PREFIX}{}__{}",
            self.source, self.destination
        )
    }
}

/// State shared by every tenant of one compilation run.
///
/// Owned by the run and lent to each tenant's [`ProcessorContext`].
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    referenced: BTreeSet<Bridge>,
    exported: BTreeSet<Bridge>,
    claimed: BTreeSet<Bridge>,
}

impl GenerationContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that some tenant imports from `bridge`.
    pub fn reference(&mut self, bridge: Bridge) {
        self.referenced.insert(bridge);
    }

    #[must_use]
    pub fn is_referenced(&self, bridge: &Bridge) -> bool {
        self.referenced.contains(bridge)
    }

    /// Records that an accepted fragment has a `share` sink towards `bridge`.
    pub fn export(&mut self, bridge: Bridge) {
        self.exported.insert(bridge);
    }

    #[must_use]
    pub fn is_exported(&self, bridge: &Bridge) -> bool {
        self.exported.contains(bridge)
    }

    /// Records that an accepted fragment declares the label for `bridge`.
    pub fn claim(&mut self, bridge: Bridge) {
        self.claimed.insert(bridge);
    }

    #[must_use]
    pub fn is_claimed(&self, bridge: &Bridge) -> bool {
        self.claimed.contains(bridge)
    }

    pub fn referenced(&self) -> impl Iterator<Item = &Bridge> {
        self.referenced.iter()
    }

    /// Referenced or exported bridges leaving `source_ns` that no accepted
    /// fragment declares, in bridge order.
    pub fn unclaimed_from<'a>(
        &'a self,
        source_ns: &'a str,
    ) -> impl Iterator<Item = &'a Bridge> + 'a {
        self.referenced
            .union(&self.exported)
            .filter(move |b| b.source == source_ns && !self.claimed.contains(*b))
    }
}

/// Context threaded through every visitor call for one tenant.
#[derive(Debug)]
pub struct ProcessorContext<'a> {
    pub tenant: &'a Tenant,
    pub generation: &'a mut GenerationContext,
    /// Bridges whose labels this tenant declared; committed only if the
    /// whole fragment is accepted.
    pub claimed: BTreeSet<Bridge>,
    /// Bridges this tenant's `share` sinks point at; committed like `claimed`.
    pub exported: BTreeSet<Bridge>,
}

impl<'a> ProcessorContext<'a> {
    pub fn new(tenant: &'a Tenant, generation: &'a mut GenerationContext) -> Self {
        Self {
            tenant,
            generation,
            claimed: BTreeSet::new(),
            exported: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.tenant.namespace
    }

    /// Moves this tenant's claims and exports into the shared generation context.
    pub fn commit(&mut self) {
        for bridge in std::mem::take(&mut self.claimed) {
            self.generation.claim(bridge);
        }
        for bridge in std::mem::take(&mut self.exported) {
            self.generation.export(bridge);
        }
    }
}

/// Read-only view handed to trailers once every tenant is processed.
#[derive(Debug, Clone, Copy)]
pub struct TrailerContext<'a> {
    pub tenant: &'a Tenant,
    pub generation: &'a GenerationContext,
}

impl<'a> TrailerContext<'a> {
    #[must_use]
    pub fn new(tenant: &'a Tenant, generation: &'a GenerationContext) -> Self {
        Self { tenant, generation }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.tenant.namespace
    }
}
