//! Confirmation publisher adapters
//!
//! Implements `ConfirmationPublisher` on top of the shared event bus, plus a
//! recording publisher for tests and embedders that poll.

use crate::ports::outbound::ConfirmationPublisher;
use parking_lot::RwLock;
use shared_bus::{ConfirmationEvent, EventPublisher, InMemoryEventBus};
use std::sync::Arc;
use tracing::debug;

/// Publishes confirmations onto the shared event bus.
pub struct EventBusConfirmationPublisher {
    event_bus: Arc<InMemoryEventBus>,
}

impl EventBusConfirmationPublisher {
    /// Create a new adapter with the given event bus.
    pub fn new(event_bus: Arc<InMemoryEventBus>) -> Self {
        Self { event_bus }
    }
}

impl ConfirmationPublisher for EventBusConfirmationPublisher {
    fn publish(&self, event: ConfirmationEvent) {
        let topic = event.topic();
        let receivers = self.event_bus.publish(event);

        if receivers == 0 {
            // Nobody listening yet, e.g. during bootstrap
            debug!(topic = ?topic, "No subscribers for confirmation event");
        }
    }
}

/// Keeps every published confirmation in memory, in publication order.
#[derive(Default)]
pub struct RecordingConfirmationPublisher {
    events: RwLock<Vec<ConfirmationEvent>>,
}

impl RecordingConfirmationPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConfirmationEvent> {
        self.events.read().clone()
    }

    /// How many times exactly this event was published.
    pub fn count(&self, event: &ConfirmationEvent) -> usize {
        self.events.read().iter().filter(|e| *e == event).count()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl ConfirmationPublisher for RecordingConfirmationPublisher {
    fn publish(&self, event: ConfirmationEvent) {
        self.events.write().push(event);
    }
}
