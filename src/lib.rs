#![doc = "Siteplan public API: budget-constrained facility placement, sub-area priority ranking and access heatmaps"]
mod allocate;
mod candidate;
mod config;
mod coverage;
mod error;
mod geom;
mod heatmap;
mod io;
mod priority;
mod region;
mod types;

pub mod cli;
pub mod commands;

#[doc(inline)]
pub use allocate::{AllocationResult, AllocationStep, GreedyAllocator, Recommendation, allocate_facilities};

#[doc(inline)]
pub use candidate::{Candidate, CandidateGenerator, CandidateSite, ClusterCount};

#[doc(inline)]
pub use config::PlannerConfig;

#[doc(inline)]
pub use coverage::{CoverageTracker, ServiceSplit, covered_population, is_covered, underserved, underserved_within};

#[doc(inline)]
pub use error::{PlanError, Result};

#[doc(inline)]
pub use geom::{BoundingBox, EARTH_RADIUS_KM, KM_PER_DEGREE, PointIndex, distance, haversine_km};

#[doc(inline)]
pub use heatmap::{Heatmap, HeatmapCell, HeatmapGridGenerator, HeatmapOptions, NO_FACILITY_DISTANCE_KM, access_score, generate_heatmap};

#[doc(inline)]
pub use priority::{DEGENERATE_NORMALIZED, PriorityScorer, PriorityWeights, RawFactors, SubAreaScore, WEIGHT_SUM_TOLERANCE, compute_priority_scores, min_max};

#[doc(inline)]
pub use region::{GeographicLevel, InMemoryRepository, Planner, RegionRepository, Scope};

#[doc(inline)]
pub use types::{Facility, FacilityTypeSpec, FacilityTypes, PopulationPoint, Regency, SubArea, total_population};
