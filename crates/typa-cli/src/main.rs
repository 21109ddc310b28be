//! Typa CLI: annotate, measure and reflow text from the command line

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Annotate(args) => commands::annotate::run(&args),
        Commands::Metrics(args) => commands::metrics::run(&args),
        Commands::Caption(args) => commands::caption::run(&args),
    }
}
