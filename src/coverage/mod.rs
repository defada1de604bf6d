mod coverage;

pub use coverage::{CoverageTracker, ServiceSplit, covered_population, is_covered, underserved, underserved_within};
