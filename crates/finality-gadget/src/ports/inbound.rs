//! Driving Ports (API - Inbound)

use crate::error::FinalityResult;
use crate::events::WeightUpdate;
use shared_types::{BranchId, Marker, MessageId, OutputId, TransactionId};
use std::ops::AddAssign;

/// What a single propagation call changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationResult {
    /// Messages whose grade was raised
    pub messages_updated: usize,
    /// Transactions whose grade was raised
    pub transactions_updated: usize,
    /// Outputs whose grade was raised
    pub outputs_updated: usize,
    /// Confirmation events published
    pub events_emitted: usize,
}

impl PropagationResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the call left every record untouched.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for PropagationResult {
    fn add_assign(&mut self, other: Self) {
        self.messages_updated += other.messages_updated;
        self.transactions_updated += other.transactions_updated;
        self.outputs_updated += other.outputs_updated;
        self.events_emitted += other.events_emitted;
    }
}

/// Confirmation queries.
///
/// Messages compare against the message confirmed level; transactions,
/// outputs and branches against the branch confirmed level. Unknown entities
/// are never confirmed.
pub trait ConfirmationOracle: Send + Sync {
    fn is_marker_confirmed(&self, marker: &Marker) -> bool;

    fn is_message_confirmed(&self, message_id: &MessageId) -> bool;

    fn is_branch_confirmed(&self, branch_id: &BranchId) -> bool;

    fn is_transaction_confirmed(&self, transaction_id: &TransactionId) -> bool;

    fn is_output_confirmed(&self, output_id: &OutputId) -> bool;

    /// Rejection is not tracked yet; always `false`.
    fn is_transaction_rejected(&self, transaction_id: &TransactionId) -> bool;

    /// Rejection is not tracked yet; always `false`.
    fn is_branch_rejected(&self, branch_id: &BranchId) -> bool;
}

/// Primary finality API
///
/// Turns approval-weight changes into grade-of-finality raises across the
/// message, transaction, output and branch records.
pub trait Gadget: ConfirmationOracle {
    /// Propagate a marker's weight backward through the message DAG.
    ///
    /// Unresolvable markers and weights below the lowest band are no-ops.
    fn handle_marker(&self, marker: &Marker, weight: f64) -> FinalityResult<PropagationResult>;

    /// Propagate a conflict branch's weight forward through the UTXO DAG.
    ///
    /// # Errors
    /// `UnsupportedBranchType` for master and aggregated branches.
    fn handle_branch(&self, branch_id: &BranchId, weight: f64)
        -> FinalityResult<PropagationResult>;

    /// Dispatch a weight update to the matching handler.
    fn process_weight_update(&self, update: &WeightUpdate) -> FinalityResult<PropagationResult> {
        match update {
            WeightUpdate::MarkerWeightChanged { marker, weight } => {
                self.handle_marker(marker, *weight)
            }
            WeightUpdate::BranchWeightChanged { branch_id, weight } => {
                self.handle_branch(branch_id, *weight)
            }
        }
    }
}
