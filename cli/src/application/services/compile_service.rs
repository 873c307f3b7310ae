//! Compile use-case: load configuration and fragments, then run the pipeline.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use kfo_core::{Compilation, Compiler, ParseError, TenantInput, is_valid_namespace, parse};

use crate::application::ports::{ConfigStore, FragmentFile, FragmentSource};
use crate::domain::InputError;

/// A fragment whose text could not be parsed; it takes no part in the run.
#[derive(Debug, Clone)]
pub struct UnparsableFragment {
    pub namespace: String,
    pub origin: String,
    pub error: ParseError,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct CompileReport {
    pub compilation: Compilation,
    pub unparsable: Vec<UnparsableFragment>,
}

impl CompileReport {
    /// Number of namespaces left out of the output, for any reason.
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.unparsable.len() + self.compilation.rejected().count()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.rejected_count() == 0
    }
}

/// Loads everything and runs the default pipeline.
///
/// A fragment that fails to parse is reported and left out; the other
/// namespaces still compile.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the fragments cannot be
/// read, or a namespace name is invalid or repeated.
pub fn compile_fragments(
    config: &impl ConfigStore,
    source: &impl FragmentSource,
) -> Result<CompileReport> {
    let config = config.load().context("cannot load configuration")?;
    config.validate()?;

    let files = source.fragments()?;
    check_namespaces(&files)?;

    let mut inputs = Vec::with_capacity(files.len());
    let mut unparsable = Vec::new();
    for file in files {
        match parse(&file.text) {
            Ok(fragment) => inputs.push(TenantInput {
                tenant: config.tenant(&file.namespace),
                fragment,
            }),
            Err(error) => {
                tracing::warn!(
                    namespace = %file.namespace,
                    origin = %file.origin,
                    %error,
                    "unparsable fragment"
                );
                unparsable.push(UnparsableFragment {
                    namespace: file.namespace,
                    origin: file.origin,
                    error,
                });
            }
        }
    }

    tracing::info!(tenants = inputs.len(), deployment = %config.deployment_id, "compiling");
    let compilation = Compiler::default().compile(inputs);
    Ok(CompileReport {
        compilation,
        unparsable,
    })
}

fn check_namespaces(files: &[FragmentFile]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for file in files {
        if !is_valid_namespace(&file.namespace) {
            return Err(InputError::InvalidNamespace {
                namespace: file.namespace.clone(),
                origin: file.origin.clone(),
            }
            .into());
        }
        if !seen.insert(file.namespace.as_str()) {
            return Err(InputError::DuplicateNamespace {
                namespace: file.namespace.clone(),
                origin: file.origin.clone(),
            }
            .into());
        }
    }
    Ok(())
}
