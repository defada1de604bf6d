use anyhow::Result;

use crate::cli::{Cli, HeatmapArgs};
use crate::commands::{emit, load_config, open_planner};
use crate::io::csv::heatmap_frame;

pub fn run(cli: &Cli, args: &HeatmapArgs) -> Result<()> {
    let config = load_config(cli, |config| {
        if let Some(grid_size) = args.grid_size {
            config.grid_size_deg = grid_size;
        }
        if let Some(radius) = args.service_radius_km {
            config.service_radius_km = radius;
        }
        Ok(())
    })?;

    let heatmap = open_planner(cli, config)?.heatmap(&args.regency, !args.relaxed)?;
    emit(&args.out, &heatmap, || heatmap_frame(&heatmap.cells))
}
