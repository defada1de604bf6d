use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::region::GeographicLevel;

/// Facility placement CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "siteplan", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding regencies.csv, sub_areas.csv, population_points.csv and facilities.csv
    #[arg(short, long, value_hint = ValueHint::DirPath, global = true, default_value = ".")]
    pub data: PathBuf,

    /// JSON config file (facility types, weights, radius, grid, clustering)
    #[arg(short, long, value_hint = ValueHint::FilePath, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend new facilities within a budget
    Allocate(AllocateArgs),

    /// Rank the sub-areas of a regency by priority score
    Priority(PriorityArgs),

    /// Build a population access heatmap for a regency
    Heatmap(HeatmapArgs),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, ValueEnum)]
pub enum OutputFormat { #[default] Json, Csv }

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
pub enum Level { SubArea, Regency, Province }

impl From<Level> for GeographicLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::SubArea => GeographicLevel::SubArea,
            Level::Regency => GeographicLevel::Regency,
            Level::Province => GeographicLevel::Province,
        }
    }
}

/// Output destination shared by every subcommand.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output file; printed to stdout when omitted
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// Total construction budget, in currency units
    pub budget: f64,

    /// Region ids to plan for, at the chosen level
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    /// Administrative level of the ids
    #[arg(short, long, value_enum, default_value_t = Level::Regency)]
    pub level: Level,

    /// Override a facility type's construction cost, e.g. --cost Pustu=450000000
    #[arg(long = "cost", value_name = "TYPE=COST", value_parser = parse_key_val)]
    pub costs: Vec<(String, f64)>,

    /// Override a facility type's coverage radius in km, e.g. --radius Puskesmas=6
    #[arg(long = "radius", value_name = "TYPE=KM", value_parser = parse_key_val)]
    pub radii: Vec<(String, f64)>,

    /// Fixed number of k-means clusters
    #[arg(long, conflicts_with = "per_type_clusters")]
    pub clusters: Option<usize>,

    /// Derive the cluster count from the number of facility types
    #[arg(long)]
    pub per_type_clusters: bool,

    /// Seed of the k-means initialization
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Args, Debug)]
pub struct PriorityArgs {
    /// Regency whose sub-areas are ranked
    pub regency: String,

    /// Gap, efficiency and vulnerability weights, e.g. --weights 0.4,0.3,0.3
    #[arg(short, long, value_delimiter = ',', value_name = "GAP,EFF,VULN")]
    pub weights: Option<Vec<f64>>,

    /// Service radius in km
    #[arg(short = 'r', long)]
    pub service_radius_km: Option<f64>,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Args, Debug)]
pub struct HeatmapArgs {
    /// Regency to rasterize
    pub regency: String,

    /// Keep every unserved or populated cell instead of the focused subset
    #[arg(long)]
    pub relaxed: bool,

    /// Grid cell size in degrees
    #[arg(short, long)]
    pub grid_size: Option<f64>,

    /// Service radius in km
    #[arg(short = 'r', long)]
    pub service_radius_km: Option<f64>,

    #[command(flatten)]
    pub out: OutputArgs,
}

/// Parse `KEY=VALUE` with a numeric value.
fn parse_key_val(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s.split_once('=')
        .ok_or_else(|| format!("expected TYPE=VALUE, got '{s}'"))?;
    let value = value.trim().parse::<f64>()
        .map_err(|e| format!("invalid number '{value}': {e}"))?;
    Ok((key.trim().to_string(), value))
}
