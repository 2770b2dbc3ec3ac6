//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Read access to the three ledger DAGs, the approval-weight source and the
//! sink for confirmation events. All lookups are synchronous in-memory reads;
//! a missing entity is reported as `None` or an empty list.

use crate::domain::{
    BranchMetadata, ConflictId, MessageMetadata, OutputMetadata, TransactionMetadata,
};
use shared_bus::ConfirmationEvent;
use shared_types::{BranchId, Marker, MessageId, OutputId, TransactionId};
use std::sync::Arc;

/// Read view over the message DAG.
pub trait MessageDag: Send + Sync {
    /// Message a marker points at, if it is known.
    fn resolve_marker(&self, marker: &Marker) -> Option<MessageId>;

    fn message_metadata(&self, message_id: &MessageId) -> Option<Arc<MessageMetadata>>;

    /// Strong parents only. Weak parents never carry finality.
    fn strong_parents(&self, message_id: &MessageId) -> Vec<MessageId>;

    /// Transaction carried as payload, if any.
    fn payload_transaction(&self, message_id: &MessageId) -> Option<TransactionId>;

    /// Messages that carry the transaction as payload.
    fn attachments(&self, transaction_id: &TransactionId) -> Vec<MessageId>;
}

/// Read view over transactions and outputs.
pub trait UtxoDag: Send + Sync {
    fn transaction_metadata(
        &self,
        transaction_id: &TransactionId,
    ) -> Option<Arc<TransactionMetadata>>;

    fn outputs_of(&self, transaction_id: &TransactionId) -> Vec<OutputId>;

    fn output_metadata(&self, output_id: &OutputId) -> Option<Arc<OutputMetadata>>;

    /// Transactions spending the output.
    fn consumers_of(&self, output_id: &OutputId) -> Vec<TransactionId>;
}

/// Read view over the conflict (branch) DAG.
pub trait BranchDag: Send + Sync {
    fn branch_metadata(&self, branch_id: &BranchId) -> Option<Arc<BranchMetadata>>;

    /// Branches that are members of the conflict.
    fn conflict_members(&self, conflict_id: &ConflictId) -> Vec<BranchId>;
}

/// Everything the gadget reads from the ledger.
pub trait Ledger: MessageDag + UtxoDag + BranchDag {}

impl<T> Ledger for T where T: MessageDag + UtxoDag + BranchDag {}

/// Current approval weight of branches, in `[0, 1]`.
pub trait ApprovalWeightSource: Send + Sync {
    fn weight_of_branch(&self, branch_id: &BranchId) -> f64;
}

/// Sink for confirmation events. Fire-and-forget.
pub trait ConfirmationPublisher: Send + Sync {
    fn publish(&self, event: ConfirmationEvent);
}
