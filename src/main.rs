use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use siteplan::cli::{Cli, Commands};
use siteplan::commands::{allocate, heatmap, priority};

/// Log to stderr; `RUST_LOG` wins over the `-v` count.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Commands::Allocate(args) => allocate::run(&cli, args),
        Commands::Priority(args) => priority::run(&cli, args),
        Commands::Heatmap(args) => heatmap::run(&cli, args),
    }
}
