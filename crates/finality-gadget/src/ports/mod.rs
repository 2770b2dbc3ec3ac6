//! Ports module for the finality gadget

pub mod inbound;
pub mod outbound;

pub use inbound::{ConfirmationOracle, Gadget, PropagationResult};
pub use outbound::{
    ApprovalWeightSource, BranchDag, ConfirmationPublisher, Ledger, MessageDag, UtxoDag,
};
