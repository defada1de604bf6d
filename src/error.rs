use thiserror::Error;

/// Errors raised at the boundary of the planning engine.
///
/// Only invalid configuration is an error. Sparse data (no points, no
/// facilities, no improving move) produces a neutral result instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("priority weights must be finite, non-negative and sum to 1.0 (got {sum:.4})")]
    InvalidWeights { sum: f64 },

    #[error("invalid facility type: {0}")]
    InvalidFacilityType(String),

    #[error("facility type '{0}' has no entry in the facility catalog")]
    UnknownFacilityType(String),

    #[error("budget must be finite and non-negative (got {0})")]
    InvalidBudget(f64),

    #[error("parameter '{name}' must be finite and positive (got {value})")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("heatmap grid has {cells} cells, exceeding the limit of {max}")]
    GridTooLarge { cells: usize, max: usize },

    #[error("region not found: {0}")]
    UnknownRegion(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// Fail with `InvalidParameter` unless `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PlanError::InvalidParameter { name, value })
    }
}
