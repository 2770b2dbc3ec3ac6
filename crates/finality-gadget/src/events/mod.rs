//! Events module for the finality gadget
//!
//! Incoming weight updates drive propagation. Outgoing confirmations are the
//! shared-bus [`ConfirmationEvent`]s.

pub mod incoming;

pub use incoming::WeightUpdate;
pub use shared_bus::ConfirmationEvent;
