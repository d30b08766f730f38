//! Varsync - Main Entry Point
//!
//! Command line front end for importing and exporting design variables.

mod cli;
mod cmd;
mod context;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::context::Context;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = Context::from_cli(&cli)?;
    tracing::debug!(store = %ctx.store_path().display(), "resolved paths");

    match &cli.command {
        Commands::Import(args) => cmd::import::run(&ctx, args).await,
        Commands::Export(args) => cmd::export::run(&ctx, args).await,
        Commands::Collections => cmd::collections::run(&ctx).await,
        Commands::Settings(command) => cmd::settings::run(&ctx, command).await,
    }
}
