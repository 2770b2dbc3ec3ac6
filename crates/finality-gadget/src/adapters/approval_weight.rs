//! Approval weight adapter
//!
//! Holds the latest branch weights reported by the approval-weight tracker.

use crate::events::WeightUpdate;
use crate::ports::outbound::ApprovalWeightSource;
use parking_lot::RwLock;
use shared_types::BranchId;
use std::collections::HashMap;
use tracing::trace;

/// In-memory branch weight table. Unknown branches weigh `0.0`.
#[derive(Default)]
pub struct InMemoryApprovalWeights {
    branch_weights: RwLock<HashMap<BranchId, f64>>,
}

impl InMemoryApprovalWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a branch weight, clamped to `[0, 1]`. NaN is stored as `0.0`.
    pub fn set_branch_weight(&self, branch_id: BranchId, weight: f64) {
        let weight = if weight.is_nan() {
            0.0
        } else {
            weight.clamp(0.0, 1.0)
        };
        trace!(branch_id = %branch_id, weight, "Branch weight updated");
        self.branch_weights.write().insert(branch_id, weight);
    }

    /// Record the branch weight carried by an update. Marker updates are ignored.
    pub fn apply(&self, update: &WeightUpdate) {
        if let WeightUpdate::BranchWeightChanged { branch_id, weight } = update {
            self.set_branch_weight(*branch_id, *weight);
        }
    }
}

impl ApprovalWeightSource for InMemoryApprovalWeights {
    fn weight_of_branch(&self, branch_id: &BranchId) -> f64 {
        self.branch_weights
            .read()
            .get(branch_id)
            .copied()
            .unwrap_or(0.0)
    }
}
