//! `kfo validate`: compile one fragment on its own.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::compile_service;
use crate::infra::SingleFileSource;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Namespace the fragment belongs to
    #[arg(short, long)]
    pub namespace: String,

    /// Fragment file
    pub file: PathBuf,
}

/// Run the validate command.
///
/// Prints the processed fragment, followed by its trailer, on stdout.
///
/// # Errors
///
/// Returns an error if configuration or the file cannot be loaded.
pub fn run(app: &AppContext, args: &ValidateArgs) -> Result<ExitCode> {
    let source = SingleFileSource::new(args.namespace.as_str(), &args.file);
    let report = compile_service::compile_fragments(&app.config_store, &source)?;

    print!("{}", report.compilation.render());
    super::report(&app.output, &report);

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
