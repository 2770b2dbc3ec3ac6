//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports, the event-bus publisher
//! and the channel listener that drives the gadget.

mod approval_weight;
mod event_bus;
mod tangle;
mod weight_listener;

pub use approval_weight::InMemoryApprovalWeights;
pub use event_bus::{EventBusConfirmationPublisher, RecordingConfirmationPublisher};
pub use tangle::{InMemoryTangle, NewMessage, NewTransaction};
pub use weight_listener::{ListenerStats, WeightUpdateListener};
