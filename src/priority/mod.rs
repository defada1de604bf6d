mod normalize;
mod scorer;
mod weights;

pub use normalize::{DEGENERATE_NORMALIZED, min_max};
pub use scorer::{PriorityScorer, RawFactors, SubAreaScore, compute_priority_scores};
pub use weights::{PriorityWeights, WEIGHT_SUM_TOLERANCE};
