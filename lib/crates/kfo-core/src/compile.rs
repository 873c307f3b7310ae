//! One compilation run over every tenant's fragment.
//!
//! The run is a three-step barrier. Every tenant's `prepare` completes before
//! any `process` starts, and every `process` completes before any trailer is
//! built. A rejected tenant never stops the others.

use crate::context::{GenerationContext, ProcessorContext, Tenant, TrailerContext};
use crate::directive::Fragment;
use crate::error::{Phase, PipelineError};
use crate::processor::Processor;
use crate::processors::default_processors;
use crate::syntax::render;

/// One tenant's fragment as submitted.
#[derive(Debug, Clone)]
pub struct TenantInput {
    pub tenant: Tenant,
    pub fragment: Fragment,
}

/// Accepted output for one tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFragment {
    /// The validated and rewritten fragment.
    pub fragment: Fragment,
    /// Directives appended after `fragment` to keep the merged configuration valid.
    pub trailer: Fragment,
}

impl CompiledFragment {
    /// `fragment` followed by `trailer`.
    #[must_use]
    pub fn combined(&self) -> Fragment {
        self.fragment.iter().chain(&self.trailer).cloned().collect()
    }
}

/// Result of compiling one tenant.
#[derive(Debug, Clone)]
pub struct TenantOutcome {
    pub namespace: String,
    pub result: Result<CompiledFragment, PipelineError>,
}

/// Result of a whole run, in input order.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub outcomes: Vec<TenantOutcome>,
}

impl Compilation {
    pub fn accepted(&self) -> impl Iterator<Item = (&str, &CompiledFragment)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|c| (o.namespace.as_str(), c)))
    }

    pub fn rejected(&self) -> impl Iterator<Item = &PipelineError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.rejected().next().is_none()
    }

    /// All accepted fragments, each followed by its trailer.
    #[must_use]
    pub fn merged(&self) -> Fragment {
        self.accepted().flat_map(|(_, c)| c.combined()).collect()
    }

    /// Text of [`Compilation::merged`].
    #[must_use]
    pub fn render(&self) -> String {
        render(&self.merged())
    }
}

/// Runs an ordered list of processors over a set of tenants.
#[derive(Debug)]
pub struct Compiler {
    processors: Vec<Box<dyn Processor + Send + Sync>>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(default_processors())
    }
}

impl Compiler {
    #[must_use]
    pub fn new(processors: Vec<Box<dyn Processor + Send + Sync>>) -> Self {
        Self { processors }
    }

    /// Names of the configured processors, in order.
    pub fn processor_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.processors.iter().map(|p| p.name())
    }

    /// Compiles every tenant with a fresh [`GenerationContext`].
    #[must_use]
    pub fn compile(&self, inputs: Vec<TenantInput>) -> Compilation {
        let mut generation = GenerationContext::new();
        tracing::debug!(tenants = inputs.len(), "compilation started");

        let mut prepared = Vec::with_capacity(inputs.len());
        for TenantInput { tenant, fragment } in inputs {
            let result = self
                .prepare_tenant(&tenant, &fragment, &mut generation)
                .map(|()| fragment);
            prepared.push((tenant, result));
        }

        let mut processed = Vec::with_capacity(prepared.len());
        for (tenant, result) in prepared {
            let result = result.and_then(|mut fragment| {
                self.process_tenant(&tenant, &mut fragment, &mut generation)?;
                Ok(fragment)
            });
            processed.push((tenant, result));
        }

        let outcomes = processed
            .into_iter()
            .map(|(tenant, result)| {
                let result = result.map(|fragment| CompiledFragment {
                    trailer: self.trailer_for(&tenant, &generation),
                    fragment,
                });
                if let Err(err) = &result {
                    tracing::warn!(
                        namespace = %tenant.namespace,
                        error = %err,
                        "fragment rejected"
                    );
                }
                TenantOutcome {
                    namespace: tenant.namespace,
                    result,
                }
            })
            .collect();

        Compilation { outcomes }
    }

    fn prepare_tenant(
        &self,
        tenant: &Tenant,
        fragment: &Fragment,
        generation: &mut GenerationContext,
    ) -> Result<(), PipelineError> {
        let _span = tracing::debug_span!("prepare", namespace = %tenant.namespace).entered();
        let mut ctx = ProcessorContext::new(tenant, generation);
        for processor in &self.processors {
            processor
                .prepare(fragment, &mut ctx)
                .map_err(|source| PipelineError {
                    namespace: tenant.namespace.clone(),
                    processor: processor.name(),
                    phase: Phase::Prepare,
                    source,
                })?;
        }
        Ok(())
    }

    fn process_tenant(
        &self,
        tenant: &Tenant,
        fragment: &mut Fragment,
        generation: &mut GenerationContext,
    ) -> Result<(), PipelineError> {
        let _span = tracing::debug_span!("process", namespace = %tenant.namespace).entered();
        let mut ctx = ProcessorContext::new(tenant, generation);
        for processor in &self.processors {
            tracing::debug!(processor = processor.name(), "running processor");
            processor
                .process(fragment, &mut ctx)
                .map_err(|source| PipelineError {
                    namespace: tenant.namespace.clone(),
                    processor: processor.name(),
                    phase: Phase::Process,
                    source,
                })?;
        }
        ctx.commit();
        Ok(())
    }

    fn trailer_for(&self, tenant: &Tenant, generation: &GenerationContext) -> Fragment {
        let ctx = TrailerContext::new(tenant, generation);
        self.processors
            .iter()
            .flat_map(|p| p.validation_trailer(&ctx))
            .collect()
    }
}
