//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::infra::CONFIG_ENV;

/// Validate and merge per-namespace log agent configuration
#[derive(Parser)]
#[command(
    name = "kfo",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile every fragment in a directory into one configuration
    Compile(commands::compile::CompileArgs),

    /// Check a single fragment and print the result
    Validate(commands::validate::ValidateArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot run to completion.
    pub fn run(self) -> Result<ExitCode> {
        let Cli {
            quiet,
            no_color,
            config,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            no_color,
            quiet,
            config,
        });
        match command {
            Command::Compile(args) => commands::compile::run(&app, &args),
            Command::Validate(args) => commands::validate::run(&app, &args),
            Command::Version => {
                commands::version::run();
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
