mod planner;
mod repository;
mod scope;

pub use planner::Planner;
pub use repository::{InMemoryRepository, RegionRepository};
pub use scope::{GeographicLevel, Scope};
