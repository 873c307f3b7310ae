//! Command implementations

pub mod compile;
pub mod validate;
pub mod version;

use kfo_core::Compilation;

use crate::application::services::compile_service::CompileReport;
use crate::output::OutputContext;

/// Reports every namespace of a run on stderr.
pub(crate) fn report(out: &OutputContext, report: &CompileReport) {
    for bad in &report.unparsable {
        out.error(&format!(
            "namespace '{}' rejected: {}: {}",
            bad.namespace, bad.origin, bad.error
        ));
    }
    report_compilation(out, &report.compilation);
}

fn report_compilation(out: &OutputContext, compilation: &Compilation) {
    for outcome in &compilation.outcomes {
        match &outcome.result {
            Ok(compiled) if compiled.trailer.is_empty() => {
                out.success(&format!("namespace '{}' accepted", outcome.namespace));
            }
            Ok(compiled) => out.warn(&format!(
                "namespace '{}' accepted with {} placeholder label(s) for unused bridges",
                outcome.namespace,
                compiled.trailer.len()
            )),
            Err(err) => out.error(&err.to_string()),
        }
    }
}
