//! Typed errors for parsing and processing directive trees.

use thiserror::Error;

// ── Syntax errors ─────────────────────────────────────────────────────────────

/// Failure to turn configuration text into a [`crate::Fragment`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed opening tag '{text}'")]
    MalformedTag { line: usize, text: String },

    #[error("line {line}: closing tag </{name}> has no open directive")]
    UnexpectedClose { line: usize, name: String },

    #[error("line {line}: closing tag </{found}> does not match <{expected}>")]
    MismatchedClose {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: directive <{name}> is never closed")]
    Unterminated { line: usize, name: String },

    #[error("line {line}: parameter '{key}' outside of any directive")]
    ParamOutsideDirective { line: usize, key: String },

    #[error("line {line}: duplicate parameter '{key}'")]
    DuplicateParam { line: usize, key: String },
}

// ── Processing errors ─────────────────────────────────────────────────────────

/// Reasons a processor rejects a tenant fragment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    /// A plugin type that is never, or not for this tenant, allowed.
    #[error("cannot use '@type {plugin}' in <{directive}>")]
    ProhibitedType { directive: String, plugin: String },

    /// A plugin parameter that would let the tenant rewrite its own tag.
    #[error("cannot modify tags using the plugin {plugin} (parameter '{param}')")]
    TagModification { plugin: String, param: String },

    /// Any `<source>` other than `mounted-file`.
    #[error("cannot use <source> directive with '@type {plugin}'")]
    ProhibitedSource { plugin: String },

    /// A label declared or targeted under the bridge prefix by the tenant itself.
    #[error("label '{label}' in <{directive}> is reserved for namespace sharing")]
    ReservedLabel { directive: String, label: String },

    /// A `share` sink or `@$from(...)` label that cannot be turned into a bridge.
    #[error("malformed sharing declaration: {reason}")]
    MalformedShare { reason: String },
}

impl ProcessError {
    pub(crate) fn prohibited_type(directive: &str, plugin: &str) -> Self {
        Self::ProhibitedType {
            directive: directive.to_string(),
            plugin: plugin.to_string(),
        }
    }

    pub(crate) fn malformed_share(reason: impl Into<String>) -> Self {
        Self::MalformedShare {
            reason: reason.into(),
        }
    }
}

/// Lifecycle hook in which a processor failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Prepare,
    Process,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Prepare => f.write_str("prepare"),
            Phase::Process => f.write_str("process"),
        }
    }
}

/// A rejected tenant fragment, with the processor and phase that rejected it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("namespace '{namespace}' rejected by {processor} ({phase}): {source}")]
pub struct PipelineError {
    pub namespace: String,
    pub processor: &'static str,
    pub phase: Phase,
    #[source]
    pub source: ProcessError,
}
