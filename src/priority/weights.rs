use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Allowed distance of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Weights of the three priority factors. Must sum to 1.0 (within tolerance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub gap: f64,
    pub efficiency: f64,
    pub vulnerability: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self { gap: 0.4, efficiency: 0.3, vulnerability: 0.3 }
    }
}

impl PriorityWeights {
    /// Build validated weights.
    pub fn new(gap: f64, efficiency: f64, vulnerability: f64) -> Result<Self> {
        let weights = Self { gap, efficiency, vulnerability };
        weights.validate()?;
        Ok(weights)
    }

    #[inline] pub fn sum(&self) -> f64 { self.gap + self.efficiency + self.vulnerability }

    /// Reject weights that are negative, non-finite, or do not sum to 1.0. Never renormalizes.
    pub fn validate(&self) -> Result<()> {
        let parts = [self.gap, self.efficiency, self.vulnerability];
        let sum = self.sum();
        // The extra 1e-9 absorbs rounding in sums like 0.4 + 0.3 + 0.301.
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE + 1e-9 {
            return Err(PlanError::InvalidWeights { sum });
        }
        Ok(())
    }

    /// Weighted sum of normalized factors.
    #[inline]
    pub fn combine(&self, gap: f64, efficiency: f64, vulnerability: f64) -> f64 {
        self.gap * gap + self.efficiency * efficiency + self.vulnerability * vulnerability
    }
}
