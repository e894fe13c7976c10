//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::command_runner::TokioCommandRunner;
use crate::commands;
use crate::compose::DockerCompose;
use crate::output::OutputContext;

/// Developer launcher for the Suna stack
#[derive(Parser)]
#[command(
    name = "suna",
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

    /// Output in JSON format (version, doctor)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the demo: mock API plus static demo page, no external services
    Demo,

    /// Start the full local stack: containers plus the frontend dev server
    Up,

    /// Minimal start: core containers, backend and frontend run on the host
    Quick,

    /// Check prerequisite tools and default ports
    Doctor,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error only for unexpected failures (I/O, signal handler
    /// registration); ordinary pipeline failures are reported on the
    /// console and the command exits cleanly.
    pub async fn run(self) -> Result<()> {
        let Cli { quiet, no_color, json, command } = self;
        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
            Command::Demo => {
                let ctx = OutputContext::new(no_color, quiet);
                commands::demo::run(&ctx).await
            }
            Command::Up => {
                let ctx = OutputContext::new(no_color, quiet);
                let runner = TokioCommandRunner::default();
                let compose = DockerCompose::new(&runner);
                commands::up::run(&ctx, &runner, &compose).await
            }
            Command::Quick => {
                let ctx = OutputContext::new(no_color, quiet);
                let runner = TokioCommandRunner::default();
                let compose = DockerCompose::new(&runner);
                commands::quick::run(&ctx, &runner, &compose).await
            }
            Command::Doctor => {
                let ctx = OutputContext::new(no_color, quiet);
                let runner = TokioCommandRunner::default();
                commands::doctor::run(&ctx, &runner, json).await
            }
        }
    }
}
