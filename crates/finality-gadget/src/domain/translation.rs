//! Approval weight → grade of finality translation.

use super::grade::GradeOfFinality;
use crate::error::{FinalityError, FinalityResult};
use serde::{Deserialize, Serialize};
use shared_types::BranchId;
use std::sync::Arc;

/// Lowest weight translated to `Low`.
pub const LOW_LOWER_BOUND: f64 = 0.2;
/// Lowest weight translated to `Medium`.
pub const MEDIUM_LOWER_BOUND: f64 = 0.3;
/// Lowest weight translated to `High`.
pub const HIGH_LOWER_BOUND: f64 = 0.5;

/// Translation applied to marker weights.
pub type MessageThresholdTranslation = Arc<dyn Fn(f64) -> GradeOfFinality + Send + Sync>;

/// Translation applied to branch weights.
pub type BranchThresholdTranslation =
    Arc<dyn Fn(&BranchId, f64) -> GradeOfFinality + Send + Sync>;

/// Lower bounds of the `Low`, `Medium` and `High` bands.
///
/// Each band includes its lower bound and excludes the next band's lower
/// bound. `High` is unbounded above.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBands {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for ThresholdBands {
    fn default() -> Self {
        Self {
            low: LOW_LOWER_BOUND,
            medium: MEDIUM_LOWER_BOUND,
            high: HIGH_LOWER_BOUND,
        }
    }
}

impl ThresholdBands {
    /// Map a weight to the grade of the band it falls into.
    ///
    /// Weights below `low`, and NaN, map to `None`.
    #[must_use]
    pub fn translate(&self, weight: f64) -> GradeOfFinality {
        if weight >= self.high {
            GradeOfFinality::High
        } else if weight >= self.medium {
            GradeOfFinality::Medium
        } else if weight >= self.low {
            GradeOfFinality::Low
        } else {
            GradeOfFinality::None
        }
    }

    /// Require `0 < low < medium < high <= 1`.
    pub fn validate(&self) -> FinalityResult<()> {
        let ordered = 0.0 < self.low
            && self.low < self.medium
            && self.medium < self.high
            && self.high <= 1.0;

        if ordered {
            Ok(())
        } else {
            Err(FinalityError::InvalidSettings {
                reason: format!(
                    "threshold bands must satisfy 0 < low < medium < high <= 1, got low={} medium={} high={}",
                    self.low, self.medium, self.high
                ),
            })
        }
    }

    /// Translation closure for marker weights.
    #[must_use]
    pub fn message_translation(self) -> MessageThresholdTranslation {
        Arc::new(move |weight| self.translate(weight))
    }

    /// Translation closure for branch weights. The branch is not consulted.
    #[must_use]
    pub fn branch_translation(self) -> BranchThresholdTranslation {
        Arc::new(move |_branch_id, weight| self.translate(weight))
    }
}

/// Default marker weight translation.
#[must_use]
pub fn default_message_translation(weight: f64) -> GradeOfFinality {
    ThresholdBands::default().translate(weight)
}

/// Default branch weight translation.
#[must_use]
pub fn default_branch_translation(_branch_id: &BranchId, weight: f64) -> GradeOfFinality {
    ThresholdBands::default().translate(weight)
}
