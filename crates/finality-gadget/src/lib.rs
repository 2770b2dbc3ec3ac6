//! # finality-gadget
//!
//! Grade-of-finality gadget for a DAG ledger.
//!
//! ## Overview
//!
//! Approval weight arrives as a fraction in `[0, 1]` for markers and for
//! conflict branches. The gadget translates it into a grade of finality
//! (`None < Low < Medium < High`) and raises that grade across:
//! - **Messages**: backward along strong parents from the marker's message
//! - **Transactions and outputs**: the payload of every raised message
//! - **Branches**: forward from the branch's transaction to its consumers
//!
//! Grades never go down. Confirmation events fire once, when a record first
//! reaches the configured confirmed level.
//!
//! ## Architecture
//!
//! ```text
//! Approval weight ──WeightUpdate──→ FinalityGadget ──ConfirmationEvent──→ shared-bus
//!                                        │
//!                                        └── reads/raises ──→ MessageDag + UtxoDag + BranchDag
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use finality_gadget::{FinalityConfig, FinalityGadget, Gadget};
//! use finality_gadget::adapters::{
//!     EventBusConfirmationPublisher, InMemoryApprovalWeights, InMemoryTangle,
//! };
//!
//! let gadget = FinalityGadget::new(
//!     FinalityConfig::default(),
//!     tangle,
//!     Arc::new(InMemoryApprovalWeights::new()),
//!     Arc::new(EventBusConfirmationPublisher::new(bus)),
//! );
//!
//! let result = gadget.handle_marker(&marker, 0.6)?;
//! let confirmed = gadget.is_marker_confirmed(&marker);
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod service;

pub use config::{FinalityConfig, FinalitySettings};
pub use domain::{
    BranchKind, BranchMetadata, GradeOfFinality, HasGradeOfFinality, MessageMetadata,
    OutputMetadata, ThresholdBands, TransactionMetadata,
};
pub use error::{FinalityError, FinalityResult};
pub use events::{ConfirmationEvent, WeightUpdate};
pub use ports::inbound::{ConfirmationOracle, Gadget, PropagationResult};
pub use ports::outbound::{
    ApprovalWeightSource, BranchDag, ConfirmationPublisher, Ledger, MessageDag, UtxoDag,
};
pub use service::FinalityGadget;
