//! Cross-namespace log sharing.
//!
//! Namespace A exports records with a `<store>` of `@type share` and
//! `with_namespace B`. Namespace B imports them by declaring a
//! `<label @$from(A)>`. Both sides meet on the bridge label
//! `@bridge-A__B`, which only exists when B actually imports.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::{Bridge, ProcessorContext, TrailerContext};
use crate::directive::{Directive, DirectiveKind, Fragment, PARAM_LABEL, PARAM_TYPE, PluginType};
use crate::error::ProcessError;
use crate::processor::Processor;
use crate::walk::{apply_recursively, visit_recursively};

/// Prefix of the import macro in a label tag: `@$from(<namespace>)`.
pub const MACRO_FROM_PREFIX: &str = "@$from(";
/// Destination namespace of a `share` sink.
pub const PARAM_WITH_NAMESPACE: &str = "with_namespace";

/// DNS-1123 label, the shape of a cluster namespace name.
static NAMESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$").expect("valid regex")
});

/// Turns `share` sinks and `@$from` labels into bridges.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShareLogs;

impl Processor for ShareLogs {
    fn name(&self) -> &'static str {
        "share"
    }

    fn prepare(
        &self,
        fragment: &Fragment,
        ctx: &mut ProcessorContext<'_>,
    ) -> Result<(), ProcessError> {
        visit_recursively(fragment, ctx, |d, ctx| -> Result<(), ProcessError> {
            if d.kind() != DirectiveKind::Label {
                return Ok(());
            }
            if let Some(source_ns) = parse_import_macro(&d.tag)? {
                let bridge = Bridge::new(source_ns, ctx.namespace());
                tracing::debug!(bridge = %bridge, "bridge referenced");
                ctx.generation.reference(bridge);
            }
            Ok(())
        })
    }

    fn process(
        &self,
        fragment: &mut Fragment,
        ctx: &mut ProcessorContext<'_>,
    ) -> Result<(), ProcessError> {
        apply_recursively(fragment, ctx, rewrite_share_sink)?;
        apply_recursively(fragment, ctx, rewrite_import_label)
    }

    fn validation_trailer(&self, ctx: &TrailerContext<'_>) -> Fragment {
        ctx.generation
            .unclaimed_from(ctx.namespace())
            .map(placeholder_label)
            .collect()
    }
}

/// `<store> @type share` becomes `relabel` to the bridge, or `null` when no
/// namespace imports from this one.
fn rewrite_share_sink(
    d: &mut Directive,
    ctx: &mut ProcessorContext<'_>,
) -> Result<(), ProcessError> {
    if d.kind() != DirectiveKind::Store || d.plugin() != PluginType::Share {
        return Ok(());
    }

    let destination = d
        .params
        .get_non_empty(PARAM_WITH_NAMESPACE)
        .map(str::trim)
        .ok_or_else(|| {
            ProcessError::malformed_share(format!(
                "<store> of '@type share' needs '{PARAM_WITH_NAMESPACE}'"
            ))
        })?;
    let destination = validate_namespace(destination)?.to_string();
    let bridge = Bridge::new(ctx.namespace(), destination);

    d.params.clear();
    if ctx.generation.is_referenced(&bridge) {
        d.set_plugin_type(PluginType::Relabel.as_str());
        d.params.set(PARAM_LABEL, bridge.label());
    } else {
        // Nobody imports: a relabel here would point at a missing label.
        tracing::debug!(bridge = %bridge, "bridge unused, sink discarded");
        d.set_plugin_type(PluginType::Null.as_str());
    }
    ctx.exported.insert(bridge);
    Ok(())
}

/// `<label @$from(A)>` becomes `<label @bridge-A__<this>>` with a tag
/// rewrite prepended to its children.
fn rewrite_import_label(
    d: &mut Directive,
    ctx: &mut ProcessorContext<'_>,
) -> Result<(), ProcessError> {
    if d.kind() != DirectiveKind::Label {
        return Ok(());
    }
    let Some(source_ns) = parse_import_macro(&d.tag)? else {
        return Ok(());
    };
    let source_ns = source_ns.to_string();

    let bridge = Bridge::new(source_ns.as_str(), ctx.namespace());
    if ctx.claimed.contains(&bridge) {
        return Err(ProcessError::malformed_share(format!(
            "namespace '{source_ns}' is imported more than once"
        )));
    }

    d.tag = bridge.label();
    let mut nested = make_rewrite_tag_fragment(&source_ns, ctx.namespace());
    nested.append(&mut d.nested);
    d.nested = nested;
    ctx.claimed.insert(bridge);
    Ok(())
}

/// Extracts the source namespace from an import macro.
///
/// Returns `Ok(None)` for ordinary label tags and for `@$from()` with nothing
/// between the parentheses.
pub fn parse_import_macro(tag: &str) -> Result<Option<&str>, ProcessError> {
    let Some(rest) = tag.strip_prefix(MACRO_FROM_PREFIX) else {
        return Ok(None);
    };
    let Some(end) = rest.rfind(')') else {
        return Err(ProcessError::malformed_share(format!("unterminated import macro '{tag}'")));
    };
    match rest[..end].trim() {
        "" => Ok(None),
        ns => validate_namespace(ns).map(Some),
    }
}

/// Whether `ns` is a valid cluster namespace name (a DNS-1123 label).
#[must_use]
pub fn is_valid_namespace(ns: &str) -> bool {
    NAMESPACE_RE.is_match(ns)
}

fn validate_namespace(ns: &str) -> Result<&str, ProcessError> {
    if is_valid_namespace(ns) {
        Ok(ns)
    } else {
        Err(ProcessError::malformed_share(format!("'{ns}' is not a valid namespace name")))
    }
}

/// Re-tags `kube.<source>.<pod>.<container>` as `kube.<dest>.<pod>.<container>`.
#[must_use]
pub fn make_rewrite_tag_fragment(source_ns: &str, dest_ns: &str) -> Fragment {
    let tag = format!("kube.{dest_ns}.${{tag_parts[2]}}.${{tag_parts[3]}}");
    let rule = Directive::new("rule", "")
        .with_param("key", "_dummy_")
        .with_param("pattern", "/ZZ/")
        .with_param("invert", "true")
        .with_param("tag", tag);

    vec![
        Directive::new("match", format!("kube.{source_ns}.**"))
            .with_param(PARAM_TYPE, PluginType::RewriteTagFilter.as_str())
            .with_child(rule),
    ]
}

fn placeholder_label(bridge: &Bridge) -> Directive {
    let discard = Directive::new("match", "**").with_param(PARAM_TYPE, PluginType::Null.as_str());
    Directive::new("label", bridge.label()).with_child(discard)
}
