//! # Shared Bus - Confirmation Event Bus
//!
//! Carries the confirmation events emitted by the finality gadget to any
//! number of downstream consumers.
//!
//! ## Rules
//!
//! - Events are broadcast notifications: fire-and-forget, no acknowledgment.
//! - A bus is an explicit object injected where it is needed; there is no
//!   process-wide registry of handlers.
//! - Publishing never blocks. A lagging subscriber loses the oldest events.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────┐
//! │ Finality Gadget  │                    │  Consumer    │
//! │                  │    publish()       │              │
//! │                  │ ──────┐            │              │
//! └──────────────────┘       │            └──────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │          │
//!                      │              │ ─────────┘
//!                      └──────────────┘  subscribe()
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{ConfirmationEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
