//! Lifecycle hooks every fragment processor may implement.

use std::fmt::Debug;

use crate::context::{ProcessorContext, TrailerContext};
use crate::directive::Fragment;
use crate::error::ProcessError;

/// A stage of the per-tenant pipeline.
///
/// A run calls `prepare` for every tenant, then `process` for every tenant,
/// then `validation_trailer` for every accepted tenant. All hooks default to
/// doing nothing.
pub trait Processor: Debug {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Read-only pass that may only grow the shared generation context.
    fn prepare(
        &self,
        _fragment: &Fragment,
        _ctx: &mut ProcessorContext<'_>,
    ) -> Result<(), ProcessError> {
        Ok(())
    }

    /// Validates and rewrites the fragment in place.
    fn process(
        &self,
        _fragment: &mut Fragment,
        _ctx: &mut ProcessorContext<'_>,
    ) -> Result<(), ProcessError> {
        Ok(())
    }

    /// Directives to append after the tenant's processed fragment.
    fn validation_trailer(&self, _ctx: &TrailerContext<'_>) -> Fragment {
        Fragment::new()
    }
}
