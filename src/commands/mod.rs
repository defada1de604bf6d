//! Subcommand implementations.

pub mod allocate;
pub mod heatmap;
pub mod priority;

use anyhow::Result;
use polars::frame::DataFrame;
use serde::Serialize;

use crate::cli::{Cli, OutputArgs, OutputFormat};
use crate::config::PlannerConfig;
use crate::io::{csv, json};
use crate::region::{InMemoryRepository, Planner};

/// Load the config file (if any) and apply `adjust` before validating.
fn load_config(cli: &Cli, adjust: impl FnOnce(&mut PlannerConfig) -> Result<()>) -> Result<PlannerConfig> {
    let mut config = PlannerConfig::load_or_default(cli.config.as_deref())?;
    adjust(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Planner over the CSV data directory given on the command line.
fn open_planner(cli: &Cli, config: PlannerConfig) -> Result<Planner<InMemoryRepository>> {
    Planner::new(InMemoryRepository::from_dir(&cli.data)?, config)
}

/// Write `value` as JSON, or `table()` as CSV, to the output file or stdout.
fn emit<T: Serialize>(out: &OutputArgs, value: &T, table: impl FnOnce() -> Result<DataFrame>) -> Result<()> {
    match (out.format, &out.output) {
        (OutputFormat::Json, Some(path)) => json::write_json(value, path)?,
        (OutputFormat::Json, None) => println!("{}", json::write_json_string(value)?),
        (OutputFormat::Csv, Some(path)) => csv::write_csv(&mut table()?, path)?,
        (OutputFormat::Csv, None) => print!("{}", csv::write_csv_string(&mut table()?)?),
    }
    if let Some(path) = &out.output {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}
