//! In-memory ledger adapter
//!
//! Implements the three DAG read ports over ID-keyed maps. Metadata records
//! are shared as `Arc`s, so grade raises made by the gadget are visible to
//! every reader without going back through the store.
//!
//! Back-references (attachments, consumers, conflict members, the marker
//! index) are adjacency lists maintained at booking time.

use crate::domain::{
    BranchKind, BranchMetadata, ConflictId, MessageMetadata, OutputMetadata, Step,
    TransactionMetadata, Walker,
};
use crate::error::{FinalityError, FinalityResult};
use crate::ports::outbound::{BranchDag, MessageDag, UtxoDag};
use parking_lot::RwLock;
use shared_types::{BranchId, Marker, MessageId, OutputId, TransactionId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A message to be booked into the tangle.
#[derive(Clone, Debug)]
pub struct NewMessage {
    id: MessageId,
    strong_parents: Vec<MessageId>,
    weak_parents: Vec<MessageId>,
    payload: Option<TransactionId>,
    marker: Option<Marker>,
}

impl NewMessage {
    pub fn new(id: MessageId) -> Self {
        Self {
            id,
            strong_parents: Vec::new(),
            weak_parents: Vec::new(),
            payload: None,
            marker: None,
        }
    }

    pub fn strong_parents(mut self, parents: impl IntoIterator<Item = MessageId>) -> Self {
        self.strong_parents.extend(parents);
        self
    }

    pub fn weak_parents(mut self, parents: impl IntoIterator<Item = MessageId>) -> Self {
        self.weak_parents.extend(parents);
        self
    }

    /// Attach a transaction as payload.
    pub fn payload(mut self, transaction_id: TransactionId) -> Self {
        self.payload = Some(transaction_id);
        self
    }

    /// Assign a marker. The message becomes a past-marker message.
    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }
}

/// A transaction to be booked into the tangle.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    id: TransactionId,
    inputs: Vec<OutputId>,
    output_count: u16,
    branch_id: Option<BranchId>,
    conflicting: bool,
}

impl NewTransaction {
    pub fn new(id: TransactionId) -> Self {
        Self {
            id,
            inputs: Vec::new(),
            output_count: 1,
            branch_id: None,
            conflicting: false,
        }
    }

    /// Outputs spent by the transaction.
    pub fn inputs(mut self, inputs: impl IntoIterator<Item = OutputId>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    /// Number of outputs created by the transaction.
    pub fn outputs(mut self, count: u16) -> Self {
        self.output_count = count;
        self
    }

    /// Book into an explicit branch instead of inheriting one from the inputs.
    pub fn branch(mut self, branch_id: BranchId) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    /// Mark the transaction as a double spend. It gets its own conflict branch.
    pub fn conflicting(mut self) -> Self {
        self.conflicting = true;
        self
    }
}

struct StoredMessage {
    metadata: Arc<MessageMetadata>,
    strong_parents: Vec<MessageId>,
    weak_parents: Vec<MessageId>,
    payload: Option<TransactionId>,
}

struct StoredTransaction {
    metadata: Arc<TransactionMetadata>,
    outputs: Vec<OutputId>,
}

#[derive(Default)]
struct TangleState {
    messages: HashMap<MessageId, StoredMessage>,
    markers: HashMap<Marker, MessageId>,
    attachments: HashMap<TransactionId, Vec<MessageId>>,
    transactions: HashMap<TransactionId, StoredTransaction>,
    outputs: HashMap<OutputId, Arc<OutputMetadata>>,
    consumers: HashMap<OutputId, Vec<TransactionId>>,
    branches: HashMap<BranchId, Arc<BranchMetadata>>,
    conflict_members: HashMap<ConflictId, Vec<BranchId>>,
}

impl TangleState {
    /// Branch a transaction spending `inputs` lives in, absent an explicit one.
    fn inherited_branch(&self, inputs: &[OutputId]) -> BranchId {
        inputs
            .iter()
            .filter_map(|input| self.transactions.get(&input.transaction_id))
            .map(|tx| tx.metadata.branch_id())
            .find(|branch_id| !branch_id.is_master())
            .unwrap_or(BranchId::MASTER)
    }

    fn parent_branches(&self, inputs: &[OutputId]) -> Vec<BranchId> {
        let mut parents: Vec<BranchId> = Vec::new();
        for input in inputs {
            if let Some(tx) = self.transactions.get(&input.transaction_id) {
                let branch_id = tx.metadata.branch_id();
                if !parents.contains(&branch_id) {
                    parents.push(branch_id);
                }
            }
        }
        if parents.is_empty() {
            parents.push(BranchId::MASTER);
        }
        parents
    }

    /// Whether `target` is among `roots` or reachable from them through the
    /// parents of aggregated branches.
    fn aggregated_ancestry_contains(&self, roots: &[BranchId], target: BranchId) -> bool {
        let mut found = false;
        Walker::new().walk(roots.iter().copied(), |branch_id| {
            if *branch_id == target {
                found = true;
                return Step::Prune;
            }
            match self.branches.get(branch_id) {
                Some(branch) if branch.kind() == BranchKind::Aggregated => {
                    Step::Descend(branch.parents().to_vec())
                }
                _ => Step::Prune,
            }
        });
        found
    }
}

/// Message, UTXO and conflict DAGs held in memory.
pub struct InMemoryTangle {
    state: RwLock<TangleState>,
}

impl InMemoryTangle {
    /// Create an empty tangle containing only the master branch.
    pub fn new() -> Self {
        let mut state = TangleState::default();
        state
            .branches
            .insert(BranchId::MASTER, Arc::new(BranchMetadata::master()));
        Self {
            state: RwLock::new(state),
        }
    }

    /// Book a message. Booking an already known message returns its metadata.
    pub fn book_message(&self, message: NewMessage) -> Arc<MessageMetadata> {
        let mut state = self.state.write();
        if let Some(existing) = state.messages.get(&message.id) {
            return Arc::clone(&existing.metadata);
        }

        let metadata = Arc::new(MessageMetadata::new(message.id, message.marker.is_some()));

        if let Some(marker) = message.marker {
            state.markers.insert(marker, message.id);
        }
        if let Some(transaction_id) = message.payload {
            state
                .attachments
                .entry(transaction_id)
                .or_default()
                .push(message.id);
        }

        trace!(
            message_id = %message.id,
            strong_parents = message.strong_parents.len(),
            weak_parents = message.weak_parents.len(),
            "Message booked"
        );

        state.messages.insert(
            message.id,
            StoredMessage {
                metadata: Arc::clone(&metadata),
                strong_parents: message.strong_parents,
                weak_parents: message.weak_parents,
                payload: message.payload,
            },
        );
        metadata
    }

    /// Book a transaction together with its outputs.
    ///
    /// A conflicting transaction creates a conflict branch sharing its ID,
    /// parented on the branches of the transactions it spends from. Other
    /// transactions take the explicit branch, or inherit the first non-master
    /// branch found among their inputs.
    ///
    /// Booking a known transaction returns its metadata. A conflicting
    /// transaction whose branch ID is already registered (the master branch
    /// included) is refused with [`FinalityError::BranchAlreadyExists`].
    pub fn book_transaction(
        &self,
        transaction: NewTransaction,
    ) -> FinalityResult<Arc<TransactionMetadata>> {
        let mut state = self.state.write();
        if let Some(existing) = state.transactions.get(&transaction.id) {
            return Ok(Arc::clone(&existing.metadata));
        }

        let branch_id = if transaction.conflicting {
            let branch_id = BranchId::from(transaction.id);
            if state.branches.contains_key(&branch_id) {
                warn!(branch_id = %branch_id, "Conflict branch ID already registered");
                return Err(FinalityError::BranchAlreadyExists { branch_id });
            }
            let branch = BranchMetadata::conflict(
                transaction.id,
                state.parent_branches(&transaction.inputs),
                transaction.inputs.clone(),
            );
            for input in &transaction.inputs {
                state
                    .conflict_members
                    .entry(*input)
                    .or_default()
                    .push(branch_id);
            }
            state.branches.insert(branch_id, Arc::new(branch));
            debug!(branch_id = %branch_id, "Conflict branch created");
            branch_id
        } else {
            transaction
                .branch_id
                .unwrap_or_else(|| state.inherited_branch(&transaction.inputs))
        };

        for input in &transaction.inputs {
            state
                .consumers
                .entry(*input)
                .or_default()
                .push(transaction.id);
        }

        let outputs: Vec<OutputId> = (0..transaction.output_count)
            .map(|index| OutputId::new(transaction.id, index))
            .collect();
        for output_id in &outputs {
            state
                .outputs
                .insert(*output_id, Arc::new(OutputMetadata::new(*output_id)));
        }

        let metadata = Arc::new(TransactionMetadata::new(
            transaction.id,
            branch_id,
            transaction.conflicting,
        ));
        state.transactions.insert(
            transaction.id,
            StoredTransaction {
                metadata: Arc::clone(&metadata),
                outputs,
            },
        );

        trace!(transaction_id = %transaction.id, branch_id = %branch_id, "Transaction booked");
        Ok(metadata)
    }

    /// Register an aggregated branch over the given parents.
    ///
    /// Registering a known branch ID returns the existing record. Parents
    /// that lead back to `branch_id` are refused with
    /// [`FinalityError::CyclicBranch`].
    pub fn add_aggregated_branch(
        &self,
        branch_id: BranchId,
        parents: Vec<BranchId>,
    ) -> FinalityResult<Arc<BranchMetadata>> {
        let mut state = self.state.write();
        if let Some(existing) = state.branches.get(&branch_id) {
            return Ok(Arc::clone(existing));
        }
        if state.aggregated_ancestry_contains(&parents, branch_id) {
            warn!(branch_id = %branch_id, "Aggregated branch would be its own ancestor");
            return Err(FinalityError::CyclicBranch { branch_id });
        }

        let branch = Arc::new(BranchMetadata::aggregated(branch_id, parents));
        state.branches.insert(branch_id, Arc::clone(&branch));
        debug!(branch_id = %branch_id, "Aggregated branch created");
        Ok(branch)
    }

    /// Move a transaction into another branch.
    ///
    /// Returns `false` if the transaction is unknown or already there.
    pub fn move_transaction_to_branch(
        &self,
        transaction_id: &TransactionId,
        branch_id: BranchId,
    ) -> bool {
        let state = self.state.read();
        state
            .transactions
            .get(transaction_id)
            .is_some_and(|tx| tx.metadata.set_branch_id(branch_id))
    }

    /// Weak parents of a message. Kept for completeness; finality never
    /// travels along weak edges.
    pub fn weak_parents(&self, message_id: &MessageId) -> Vec<MessageId> {
        self.state
            .read()
            .messages
            .get(message_id)
            .map(|m| m.weak_parents.clone())
            .unwrap_or_default()
    }
}

impl Default for InMemoryTangle {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageDag for InMemoryTangle {
    fn resolve_marker(&self, marker: &Marker) -> Option<MessageId> {
        self.state.read().markers.get(marker).copied()
    }

    fn message_metadata(&self, message_id: &MessageId) -> Option<Arc<MessageMetadata>> {
        self.state
            .read()
            .messages
            .get(message_id)
            .map(|m| Arc::clone(&m.metadata))
    }

    fn strong_parents(&self, message_id: &MessageId) -> Vec<MessageId> {
        self.state
            .read()
            .messages
            .get(message_id)
            .map(|m| m.strong_parents.clone())
            .unwrap_or_default()
    }

    fn payload_transaction(&self, message_id: &MessageId) -> Option<TransactionId> {
        self.state
            .read()
            .messages
            .get(message_id)
            .and_then(|m| m.payload)
    }

    fn attachments(&self, transaction_id: &TransactionId) -> Vec<MessageId> {
        self.state
            .read()
            .attachments
            .get(transaction_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl UtxoDag for InMemoryTangle {
    fn transaction_metadata(
        &self,
        transaction_id: &TransactionId,
    ) -> Option<Arc<TransactionMetadata>> {
        self.state
            .read()
            .transactions
            .get(transaction_id)
            .map(|tx| Arc::clone(&tx.metadata))
    }

    fn outputs_of(&self, transaction_id: &TransactionId) -> Vec<OutputId> {
        self.state
            .read()
            .transactions
            .get(transaction_id)
            .map(|tx| tx.outputs.clone())
            .unwrap_or_default()
    }

    fn output_metadata(&self, output_id: &OutputId) -> Option<Arc<OutputMetadata>> {
        self.state.read().outputs.get(output_id).cloned()
    }

    fn consumers_of(&self, output_id: &OutputId) -> Vec<TransactionId> {
        self.state
            .read()
            .consumers
            .get(output_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl BranchDag for InMemoryTangle {
    fn branch_metadata(&self, branch_id: &BranchId) -> Option<Arc<BranchMetadata>> {
        self.state.read().branches.get(branch_id).cloned()
    }

    fn conflict_members(&self, conflict_id: &ConflictId) -> Vec<BranchId> {
        self.state
            .read()
            .conflict_members
            .get(conflict_id)
            .cloned()
            .unwrap_or_default()
    }
}
