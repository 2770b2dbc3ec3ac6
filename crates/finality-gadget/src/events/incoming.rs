//! Incoming events for the finality gadget

use serde::{Deserialize, Serialize};
use shared_types::{BranchId, Marker};

/// Signal from the approval-weight tracker.
///
/// Weights are fractions of the total active weight, in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WeightUpdate {
    /// The approval weight of a marker changed.
    MarkerWeightChanged { marker: Marker, weight: f64 },
    /// The approval weight of a branch changed.
    BranchWeightChanged { branch_id: BranchId, weight: f64 },
}

impl WeightUpdate {
    #[must_use]
    pub fn weight(&self) -> f64 {
        match self {
            Self::MarkerWeightChanged { weight, .. } | Self::BranchWeightChanged { weight, .. } => {
                *weight
            }
        }
    }
}
