//! Validation and rewriting of per-namespace log agent configuration.
//!
//! Each tenant submits a fragment of directives. A [`Compiler`] runs the
//! fragments through an ordered list of [`Processor`]s and produces a merged
//! configuration that is safe to load into one shared agent.

pub mod compile;
pub mod context;
pub mod directive;
pub mod error;
pub mod processor;
pub mod processors;
pub mod syntax;
pub mod walk;

pub use compile::{Compilation, CompiledFragment, Compiler, TenantInput, TenantOutcome};
pub use context::{
    Bridge, GenerationContext, ProcessorContext, Tenant, TenantPolicy, TrailerContext,
};
pub use directive::{Directive, DirectiveKind, Fragment, Param, Params, PluginType};
pub use error::{ParseError, Phase, PipelineError, ProcessError};
pub use processor::Processor;
pub use processors::share::is_valid_namespace;
pub use processors::{DestinationGuard, ShareLogs, default_processors};
pub use syntax::{parse, render};
pub use walk::{apply_recursively, visit_recursively};
