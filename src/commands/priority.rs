use anyhow::{Result, bail};

use crate::cli::{Cli, PriorityArgs};
use crate::commands::{emit, load_config, open_planner};
use crate::io::csv::scores_frame;
use crate::priority::PriorityWeights;

pub fn run(cli: &Cli, args: &PriorityArgs) -> Result<()> {
    let config = load_config(cli, |config| {
        if let Some(radius) = args.service_radius_km {
            config.service_radius_km = radius;
        }
        Ok(())
    })?;

    let weights = match args.weights.as_deref() {
        Some(&[gap, efficiency, vulnerability]) => Some(PriorityWeights::new(gap, efficiency, vulnerability)?),
        Some(other) => bail!("expected three weights, got {}", other.len()),
        None => None,
    };

    let scores = open_planner(cli, config)?.priority_scores(&args.regency, weights)?;
    emit(&args.out, &scores, || scores_frame(&scores))
}
