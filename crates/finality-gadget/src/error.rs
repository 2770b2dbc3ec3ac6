//! Error types for the finality gadget

use crate::domain::BranchKind;
use shared_types::BranchId;
use thiserror::Error;

/// Finality gadget errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FinalityError {
    /// Branch-level propagation requested for a master or aggregated branch
    #[error("Unsupported branch type {kind:?} for branch {branch_id}")]
    UnsupportedBranchType { branch_id: BranchId, kind: BranchKind },

    /// Branch not present in the conflict DAG
    #[error("Branch not found: {branch_id}")]
    BranchNotFound { branch_id: BranchId },

    /// A conflict branch would reuse an identifier that is already registered
    #[error("Branch already exists: {branch_id}")]
    BranchAlreadyExists { branch_id: BranchId },

    /// An aggregated branch would be its own ancestor
    #[error("Aggregated branch {branch_id} is its own ancestor")]
    CyclicBranch { branch_id: BranchId },

    /// Settings failed validation
    #[error("Invalid finality settings: {reason}")]
    InvalidSettings { reason: String },

    /// Settings document could not be decoded
    #[error("Failed to parse finality settings: {reason}")]
    SettingsParse { reason: String },
}

/// Result type for finality operations
pub type FinalityResult<T> = Result<T, FinalityError>;
