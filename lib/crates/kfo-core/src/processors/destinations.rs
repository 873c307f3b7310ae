//! Destination guard: keeps a tenant from running commands, reading or
//! writing arbitrary files, retagging records or reaching into bridge labels,
//! and moves on-disk buffers to per-tenant paths.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::context::{BRIDGE_LABEL_PREFIX, ProcessorContext, Tenant};
use crate::directive::{Directive, DirectiveKind, Fragment, PARAM_LABEL, PluginType};
use crate::error::ProcessError;
use crate::processor::Processor;
use crate::walk::apply_recursively;

/// Buffer location parameter on `match` and `store`.
pub const PARAM_BUFFER_PATH: &str = "buffer_path";
/// Buffer location parameter on `<buffer>` sections of type `file`.
pub const PARAM_PATH: &str = "path";

const LOG_ROOT: &str = "/var/log";
/// Bytes of SHA-256 kept in buffer file names.
const HASH_BYTES: usize = 10;

/// Tag-rewriting parameters of `fields_parser`.
const TAG_PREFIX_PARAMS: &[&str] = &["remove_tag_prefix", "add_tag_prefix"];

static UNSAFE_NAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern, cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"[^A-Za-z0-9-]").expect("valid regex")
});

type Rule = fn(&mut Directive, &mut ProcessorContext<'_>) -> Result<(), ProcessError>;

/// Enforces the isolation policy on sinks, filters and sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct DestinationGuard;

impl Processor for DestinationGuard {
    fn name(&self) -> &'static str {
        "destinations"
    }

    fn process(
        &self,
        fragment: &mut Fragment,
        ctx: &mut ProcessorContext<'_>,
    ) -> Result<(), ProcessError> {
        let rules: [Rule; 4] = [
            prohibit_types,
            protect_bridge_labels,
            rewrite_buffer_path,
            prohibit_sources,
        ];

        for rule in rules {
            apply_recursively(fragment, ctx, rule)?;
        }
        Ok(())
    }
}

/// Rejects plugin types a tenant may not use in `match`, `store` or `filter`.
fn prohibit_types(d: &mut Directive, ctx: &mut ProcessorContext<'_>) -> Result<(), ProcessError> {
    let kind = d.kind();
    if !kind.is_plugin_host() {
        return Ok(());
    }

    let policy = ctx.tenant.policy;
    let allowed = match d.plugin() {
        PluginType::Exec
        | PluginType::ExecFilter
        | PluginType::Stdout
        | PluginType::RewriteTagFilter => false,
        PluginType::DetectExceptions => kind != DirectiveKind::Match,
        PluginType::File => policy.allow_file,
        PluginType::MountedFile => policy.allow_mounted_file,
        PluginType::FieldsParser => {
            if let Some(param) = TAG_PREFIX_PARAMS
                .iter()
                .find(|p| d.params.get_non_empty(p).is_some())
            {
                return Err(ProcessError::TagModification {
                    plugin: d.plugin_type().to_string(),
                    param: (*param).to_string(),
                });
            }
            true
        }
        PluginType::Share | PluginType::Relabel | PluginType::Null | PluginType::Other(_) => true,
    };

    if allowed {
        Ok(())
    } else {
        tracing::debug!(
            namespace = %ctx.tenant.namespace,
            directive = %d.name,
            plugin = %d.plugin_type(),
            "prohibited plugin type"
        );
        Err(ProcessError::prohibited_type(&d.name, d.plugin_type()))
    }
}

/// Bridge labels only come from the sharing rewrite, which runs after this
/// guard. A tenant may neither declare one nor route records into one.
fn protect_bridge_labels(
    d: &mut Directive,
    _ctx: &mut ProcessorContext<'_>,
) -> Result<(), ProcessError> {
    let declared = (d.kind() == DirectiveKind::Label).then_some(d.tag.as_str());
    let reserved = declared
        .into_iter()
        .chain(d.params.get(PARAM_LABEL))
        .map(str::trim)
        .find(|label| label.starts_with(BRIDGE_LABEL_PREFIX));

    match reserved {
        Some(label) => Err(ProcessError::ReservedLabel {
            directive: d.name.clone(),
            label: label.to_string(),
        }),
        None => Ok(()),
    }
}

/// Points buffer files at per-tenant locations.
fn rewrite_buffer_path(
    d: &mut Directive,
    ctx: &mut ProcessorContext<'_>,
) -> Result<(), ProcessError> {
    let param = match (d.kind(), d.plugin()) {
        (DirectiveKind::Match | DirectiveKind::Store, _) => PARAM_BUFFER_PATH,
        (DirectiveKind::Buffer, PluginType::File) => PARAM_PATH,
        _ => return Ok(()),
    };

    let rewritten = d
        .params
        .get_non_empty(param)
        .map(|original| make_safe_buffer_path(ctx.tenant, original));
    if let Some(safe) = rewritten {
        d.params.set(param, safe);
    }
    Ok(())
}

/// Only already-mounted log files may be ingested.
fn prohibit_sources(
    d: &mut Directive,
    _ctx: &mut ProcessorContext<'_>,
) -> Result<(), ProcessError> {
    if d.kind() != DirectiveKind::Source {
        return Ok(());
    }
    match d.plugin() {
        PluginType::MountedFile => Ok(()),
        other => Err(ProcessError::ProhibitedSource {
            plugin: other.as_str().to_string(),
        }),
    }
}

/// Builds `<root>/kfo-<deployment>-<namespace>-<hash>.buf` for `original`.
///
/// The result depends only on the tenant's deployment id, namespace, mount
/// folder and the original path.
#[must_use]
pub fn make_safe_buffer_path(tenant: &Tenant, original: &str) -> String {
    let file = format!(
        "kfo-{}-{}-{}.buf",
        make_safe_name(&tenant.deployment_id),
        tenant.namespace,
        hash("", original)
    );
    match tenant.buffer_mount_folder.as_deref() {
        Some(folder) if !folder.is_empty() => format!("{LOG_ROOT}/{folder}/{file}"),
        _ => format!("{LOG_ROOT}/{file}"),
    }
}

/// Replaces every character outside `[A-Za-z0-9-]` with `-`.
#[must_use]
pub fn make_safe_name(name: &str) -> String {
    UNSAFE_NAME_CHARS.replace_all(name, "-").into_owned()
}

/// Short, stable digest of `value` under `salt`.
#[must_use]
pub fn hash(salt: &str, value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(value.as_bytes());
    hex_encode(&hasher.finalize()[..HASH_BYTES])
}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}
