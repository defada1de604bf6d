mod cell;
mod grid;

pub use cell::{Heatmap, HeatmapCell, NO_FACILITY_DISTANCE_KM};
pub use grid::{HeatmapGridGenerator, HeatmapOptions, access_score, generate_heatmap};
