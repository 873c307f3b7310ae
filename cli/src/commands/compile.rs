//! `kfo compile`: merge every namespace fragment of a directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::compile_service;
use crate::infra::DirectorySource;

/// Arguments for the compile command.
#[derive(Args)]
pub struct CompileArgs {
    /// Directory of `<namespace>.conf` fragments
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write the merged configuration here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the compile command.
///
/// Accepted namespaces are always written; the exit code is non-zero when any
/// namespace was rejected.
///
/// # Errors
///
/// Returns an error if configuration or fragments cannot be loaded or the
/// output cannot be written.
pub fn run(app: &AppContext, args: &CompileArgs) -> Result<ExitCode> {
    let source = DirectorySource::new(&args.input);
    let report = compile_service::compile_fragments(&app.config_store, &source)?;
    let text = report.compilation.render();

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => print!("{text}"),
    }

    super::report(&app.output, &report);
    if let Some(path) = &args.output {
        app.output.kv("output", &path.display().to_string());
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        app.output
            .error(&format!("{} namespace(s) rejected", report.rejected_count()));
        Ok(ExitCode::FAILURE)
    }
}
