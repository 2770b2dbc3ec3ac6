//! # Shared Types Crate
//!
//! This crate contains the identifiers of every entity the finality
//! subsystem touches: messages of the message DAG, transactions and outputs
//! of the UTXO DAG, conflict branches, and markers.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate identifiers are defined here.
//! - **Identity by construction**: A conflict branch is identified by the
//!   transaction that created it (`BranchId::from(TransactionId)`), the
//!   master branch by a reserved all-zero identifier.

pub mod entities;

pub use entities::*;
