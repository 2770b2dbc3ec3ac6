//! # Confirmation Events
//!
//! Defines the event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::entities::{BranchId, MessageId, TransactionId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfirmationEvent {
    /// A message reached the configured message confirmation level.
    MessageConfirmed(MessageId),

    /// A transaction reached the configured branch confirmation level.
    TransactionConfirmed(TransactionId),

    /// A branch reached the configured branch confirmation level.
    BranchConfirmed(BranchId),
}

impl ConfirmationEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::MessageConfirmed(_) => EventTopic::Message,
            Self::TransactionConfirmed(_) => EventTopic::Transaction,
            Self::BranchConfirmed(_) => EventTopic::Branch,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Message confirmations.
    Message,
    /// Transaction confirmations.
    Transaction,
    /// Branch confirmations.
    Branch,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ConfirmationEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
