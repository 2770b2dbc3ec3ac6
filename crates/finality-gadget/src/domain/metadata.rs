//! Mutable per-entity metadata records.
//!
//! Records are shared as `Arc`s between the ledger and the gadget. The only
//! state the gadget writes is the grade of finality, which can only be raised.

use super::grade::{GradeCell, GradeOfFinality, HasGradeOfFinality};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::{BranchId, MessageId, OutputId, TransactionId};

/// A conflict is identified by the output that is spent more than once.
pub type ConflictId = OutputId;

/// Metadata of a message in the message DAG.
#[derive(Debug)]
pub struct MessageMetadata {
    id: MessageId,
    grade: GradeCell,
    past_marker: bool,
}

impl MessageMetadata {
    #[must_use]
    pub fn new(id: MessageId, past_marker: bool) -> Self {
        Self {
            id,
            grade: GradeCell::default(),
            past_marker,
        }
    }

    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Whether the message was assigned a marker when it was booked.
    #[must_use]
    pub fn is_past_marker(&self) -> bool {
        self.past_marker
    }
}

impl HasGradeOfFinality for MessageMetadata {
    fn grade_cell(&self) -> &GradeCell {
        &self.grade
    }
}

/// Metadata of a transaction in the UTXO DAG.
#[derive(Debug)]
pub struct TransactionMetadata {
    id: TransactionId,
    grade: GradeCell,
    branch_id: RwLock<BranchId>,
    conflicting: bool,
}

impl TransactionMetadata {
    #[must_use]
    pub fn new(id: TransactionId, branch_id: BranchId, conflicting: bool) -> Self {
        Self {
            id,
            grade: GradeCell::default(),
            branch_id: RwLock::new(branch_id),
            conflicting,
        }
    }

    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    #[must_use]
    pub fn branch_id(&self) -> BranchId {
        *self.branch_id.read()
    }

    /// Move the transaction into another branch. Returns whether it changed.
    pub fn set_branch_id(&self, branch_id: BranchId) -> bool {
        let mut current = self.branch_id.write();
        if *current == branch_id {
            return false;
        }
        *current = branch_id;
        true
    }

    #[must_use]
    pub fn is_conflicting(&self) -> bool {
        self.conflicting
    }
}

impl HasGradeOfFinality for TransactionMetadata {
    fn grade_cell(&self) -> &GradeCell {
        &self.grade
    }
}

/// Metadata of a transaction output.
#[derive(Debug)]
pub struct OutputMetadata {
    id: OutputId,
    grade: GradeCell,
}

impl OutputMetadata {
    #[must_use]
    pub fn new(id: OutputId) -> Self {
        Self {
            id,
            grade: GradeCell::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> OutputId {
        self.id
    }
}

impl HasGradeOfFinality for OutputMetadata {
    fn grade_cell(&self) -> &GradeCell {
        &self.grade
    }
}

/// Kind of a branch in the conflict DAG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchKind {
    /// The conflict-free root branch.
    Master,
    /// Created by a conflicting transaction.
    Conflict,
    /// Union of several conflict branches.
    Aggregated,
}

/// Metadata of a branch in the conflict DAG.
#[derive(Debug)]
pub struct BranchMetadata {
    id: BranchId,
    kind: BranchKind,
    parents: Vec<BranchId>,
    conflicts: Vec<ConflictId>,
    grade: GradeCell,
}

impl BranchMetadata {
    #[must_use]
    pub fn master() -> Self {
        Self {
            id: BranchId::MASTER,
            kind: BranchKind::Master,
            parents: Vec::new(),
            conflicts: Vec::new(),
            grade: GradeCell::new(GradeOfFinality::High),
        }
    }

    /// A conflict branch takes the identity of the transaction that created it.
    #[must_use]
    pub fn conflict(
        transaction_id: TransactionId,
        parents: Vec<BranchId>,
        conflicts: Vec<ConflictId>,
    ) -> Self {
        Self {
            id: BranchId::from(transaction_id),
            kind: BranchKind::Conflict,
            parents,
            conflicts,
            grade: GradeCell::default(),
        }
    }

    #[must_use]
    pub fn aggregated(id: BranchId, parents: Vec<BranchId>) -> Self {
        Self {
            id,
            kind: BranchKind::Aggregated,
            parents,
            conflicts: Vec::new(),
            grade: GradeCell::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> BranchId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> BranchKind {
        self.kind
    }

    #[must_use]
    pub fn parents(&self) -> &[BranchId] {
        &self.parents
    }

    /// Conflicts this branch is a member of.
    #[must_use]
    pub fn conflicts(&self) -> &[ConflictId] {
        &self.conflicts
    }
}

impl HasGradeOfFinality for BranchMetadata {
    fn grade_cell(&self) -> &GradeCell {
        &self.grade
    }
}
