//! Domain module for the finality gadget
//!
//! - grade: the grade-of-finality lattice and its atomic cell
//! - translation: weight → grade bands
//! - metadata: message, transaction, output and branch records
//! - walker: traversal worklist

pub mod grade;
pub mod metadata;
pub mod translation;
pub mod walker;

pub use grade::{GradeCell, GradeOfFinality, HasGradeOfFinality, Raise};
pub use metadata::{
    BranchKind, BranchMetadata, ConflictId, MessageMetadata, OutputMetadata, TransactionMetadata,
};
pub use translation::{
    default_branch_translation, default_message_translation, BranchThresholdTranslation,
    MessageThresholdTranslation, ThresholdBands, HIGH_LOWER_BOUND, LOW_LOWER_BOUND,
    MEDIUM_LOWER_BOUND,
};
pub use walker::{Step, Walker};
