use anyhow::Result;
use tracing::info;

use crate::candidate::ClusterCount;
use crate::cli::{AllocateArgs, Cli};
use crate::commands::{emit, load_config, open_planner};
use crate::io::csv::recommendations_frame;
use crate::region::Scope;

pub fn run(cli: &Cli, args: &AllocateArgs) -> Result<()> {
    let config = load_config(cli, |config| {
        for (name, cost) in &args.costs {
            config.facility_types = std::mem::take(&mut config.facility_types).with_cost(name, *cost)?;
        }
        for (name, radius) in &args.radii {
            config.facility_types = std::mem::take(&mut config.facility_types).with_radius(name, *radius)?;
        }
        if let Some(clusters) = args.clusters {
            config.cluster_count = ClusterCount::Fixed(clusters);
        }
        if args.per_type_clusters {
            config.cluster_count = ClusterCount::per_facility_type();
        }
        if let Some(seed) = args.seed {
            config.seed = seed;
        }
        Ok(())
    })?;

    let scope = Scope::new(args.level.into(), args.ids.iter().cloned());
    let planner = open_planner(cli, config)?;
    let result = planner.simulate(&scope, args.budget)?;

    info!("{result}");
    emit(&args.out, &result, || recommendations_frame(&result.recommendations))
}
