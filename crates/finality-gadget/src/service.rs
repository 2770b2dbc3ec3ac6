//! Finality Gadget - Core propagation logic
//!
//! Marker weights travel backward through the strong-parent edges of the
//! message DAG and cascade into payload transactions. Branch weights travel
//! forward from the branch's transaction through the outputs it creates to
//! the transactions that consume them.
//!
//! Every grade write is an atomic raise on the record itself, so concurrent
//! calls need no shared lock and each upward crossing of a confirmed level is
//! observed, and published, by exactly one caller.

use crate::config::FinalityConfig;
use crate::domain::{
    BranchKind, BranchMetadata, GradeOfFinality, HasGradeOfFinality, Step, TransactionMetadata,
    Walker,
};
use crate::error::{FinalityError, FinalityResult};
use crate::ports::inbound::{ConfirmationOracle, Gadget, PropagationResult};
use crate::ports::outbound::{ApprovalWeightSource, ConfirmationPublisher, Ledger};
use shared_bus::ConfirmationEvent;
use shared_types::{BranchId, Marker, MessageId, OutputId, TransactionId};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// The grade-of-finality gadget.
pub struct FinalityGadget<L, W, P>
where
    L: Ledger,
    W: ApprovalWeightSource,
    P: ConfirmationPublisher,
{
    config: FinalityConfig,
    ledger: Arc<L>,
    weights: Arc<W>,
    publisher: Arc<P>,
}

impl<L, W, P> FinalityGadget<L, W, P>
where
    L: Ledger,
    W: ApprovalWeightSource,
    P: ConfirmationPublisher,
{
    pub fn new(config: FinalityConfig, ledger: Arc<L>, weights: Arc<W>, publisher: Arc<P>) -> Self {
        debug!(?config, "Finality gadget created");
        Self {
            config,
            ledger,
            weights,
            publisher,
        }
    }

    pub fn config(&self) -> &FinalityConfig {
        &self.config
    }

    /// Grade of finality of a branch.
    ///
    /// The master branch is always `High`. A conflict branch reports its own
    /// grade. An aggregated branch is as final as its least final parent.
    /// Aggregated ancestry that loops back on itself yields
    /// [`FinalityError::CyclicBranch`].
    pub fn branch_grade_of_finality(
        &self,
        branch_id: &BranchId,
    ) -> FinalityResult<GradeOfFinality> {
        self.branch_grade_along(branch_id, &mut Vec::new())
    }

    /// `path` holds the aggregated branches currently being resolved.
    fn branch_grade_along(
        &self,
        branch_id: &BranchId,
        path: &mut Vec<BranchId>,
    ) -> FinalityResult<GradeOfFinality> {
        let branch = self
            .ledger
            .branch_metadata(branch_id)
            .ok_or(FinalityError::BranchNotFound {
                branch_id: *branch_id,
            })?;

        match branch.kind() {
            BranchKind::Master => Ok(GradeOfFinality::High),
            BranchKind::Conflict => Ok(branch.grade_of_finality()),
            BranchKind::Aggregated => {
                if path.contains(branch_id) {
                    return Err(FinalityError::CyclicBranch {
                        branch_id: *branch_id,
                    });
                }
                path.push(*branch_id);

                let mut lowest: Option<GradeOfFinality> = None;
                for parent in branch.parents() {
                    let grade = self.branch_grade_along(parent, path)?;
                    lowest = Some(lowest.map_or(grade, |l| l.min(grade)));
                }
                path.pop();

                // An aggregated branch without parents is malformed
                Ok(lowest.unwrap_or(GradeOfFinality::None))
            }
        }
    }

    /// Highest grade among the messages the transaction is attached to.
    fn max_attachment_grade(&self, transaction_id: &TransactionId) -> GradeOfFinality {
        self.ledger
            .attachments(transaction_id)
            .iter()
            .filter_map(|message_id| self.ledger.message_metadata(message_id))
            .map(|metadata| metadata.grade_of_finality())
            .max()
            .unwrap_or(GradeOfFinality::None)
    }

    /// One step of the backward walk from a marker.
    fn propagate_to_message(
        &self,
        message_id: &MessageId,
        candidate: GradeOfFinality,
        result: &mut PropagationResult,
    ) -> Step<MessageId> {
        let Some(metadata) = self.ledger.message_metadata(message_id) else {
            trace!(message_id = %message_id, "Unknown message, pruning");
            return Step::Prune;
        };

        // Everything behind a marker that is already this final was covered
        // by that marker's own propagation.
        if metadata.is_past_marker() && metadata.grade_of_finality() >= candidate {
            trace!(message_id = %message_id, "Reached final marker, pruning");
            return Step::Prune;
        }

        let raise = metadata.raise_grade_of_finality(candidate);
        if !raise.changed() {
            return Step::Prune;
        }
        result.messages_updated += 1;
        trace!(message_id = %message_id, grade = ?candidate, "Message grade raised");

        if let Some(transaction_id) = self.ledger.payload_transaction(message_id) {
            self.propagate_to_payload(&transaction_id, candidate, result);
        }

        if raise.crossed(self.config.message_confirmed_level) {
            self.emit(ConfirmationEvent::MessageConfirmed(*message_id), result);
        }

        Step::Descend(self.ledger.strong_parents(message_id))
    }

    /// Cascade a raised message grade into its payload transaction.
    fn propagate_to_payload(
        &self,
        transaction_id: &TransactionId,
        message_grade: GradeOfFinality,
        result: &mut PropagationResult,
    ) {
        let Some(transaction) = self.ledger.transaction_metadata(transaction_id) else {
            return;
        };

        let grade = if transaction.is_conflicting() {
            let branch_id = BranchId::from(*transaction_id);
            let weight = self.weights.weight_of_branch(&branch_id);
            self.config.translate_branch(&branch_id, weight)
        } else {
            message_grade
        };

        self.raise_transaction(&transaction, grade, result);
    }

    /// Raise a transaction and its outputs. Returns whether the transaction changed.
    fn raise_transaction(
        &self,
        transaction: &TransactionMetadata,
        grade: GradeOfFinality,
        result: &mut PropagationResult,
    ) -> bool {
        let raise = transaction.raise_grade_of_finality(grade);
        if !raise.changed() {
            return false;
        }
        result.transactions_updated += 1;
        trace!(transaction_id = %transaction.id(), grade = ?grade, "Transaction grade raised");

        // Outputs never move past their transaction, and never move down.
        for output_id in self.ledger.outputs_of(&transaction.id()) {
            if let Some(output) = self.ledger.output_metadata(&output_id) {
                if output.raise_grade_of_finality(grade).changed() {
                    result.outputs_updated += 1;
                }
            }
        }

        if raise.crossed(self.config.branch_confirmed_level) {
            self.emit(
                ConfirmationEvent::TransactionConfirmed(transaction.id()),
                result,
            );
        }
        true
    }

    /// One step of the forward walk from a branch.
    fn propagate_to_transaction(
        &self,
        transaction_id: &TransactionId,
        branch_id: &BranchId,
        candidate: GradeOfFinality,
        result: &mut PropagationResult,
    ) -> Step<TransactionId> {
        let Some(transaction) = self.ledger.transaction_metadata(transaction_id) else {
            return Step::Prune;
        };

        if transaction.branch_id() != *branch_id {
            trace!(transaction_id = %transaction_id, "Left the branch, pruning");
            return Step::Prune;
        }

        // A transaction is never more final than the messages carrying it.
        if self.max_attachment_grade(transaction_id) < candidate {
            trace!(transaction_id = %transaction_id, "Attachments not final enough, pruning");
            return Step::Prune;
        }

        if !self.raise_transaction(&transaction, candidate, result) {
            return Step::Prune;
        }

        let consumers: Vec<TransactionId> = self
            .ledger
            .outputs_of(transaction_id)
            .iter()
            .flat_map(|output_id| self.ledger.consumers_of(output_id))
            .collect();
        Step::Descend(consumers)
    }

    fn log_branch_confirmed(&self, branch: &BranchMetadata) {
        let rivals = branch
            .conflicts()
            .iter()
            .flat_map(|conflict_id| self.ledger.conflict_members(conflict_id))
            .filter(|member| *member != branch.id())
            .count();
        info!(branch_id = %branch.id(), rivals, "Branch confirmed");
    }

    fn emit(&self, event: ConfirmationEvent, result: &mut PropagationResult) {
        debug!(event = ?event, "Publishing confirmation");
        self.publisher.publish(event);
        result.events_emitted += 1;
    }
}

impl<L, W, P> Gadget for FinalityGadget<L, W, P>
where
    L: Ledger,
    W: ApprovalWeightSource,
    P: ConfirmationPublisher,
{
    fn handle_marker(&self, marker: &Marker, weight: f64) -> FinalityResult<PropagationResult> {
        let candidate = self.config.translate_message(weight);
        if candidate == GradeOfFinality::None {
            return Ok(PropagationResult::empty());
        }

        let Some(message_id) = self.ledger.resolve_marker(marker) else {
            debug!(marker = %marker, "Marker does not resolve to a message");
            return Ok(PropagationResult::empty());
        };
        let Some(metadata) = self.ledger.message_metadata(&message_id) else {
            debug!(message_id = %message_id, "Marker message has no metadata");
            return Ok(PropagationResult::empty());
        };
        if candidate <= metadata.grade_of_finality() {
            return Ok(PropagationResult::empty());
        }

        let mut result = PropagationResult::empty();
        let visited = Walker::new().walk([message_id], |message_id| {
            self.propagate_to_message(message_id, candidate, &mut result)
        });

        debug!(
            marker = %marker,
            grade = ?candidate,
            visited,
            messages = result.messages_updated,
            transactions = result.transactions_updated,
            "Marker propagated"
        );
        Ok(result)
    }

    fn handle_branch(
        &self,
        branch_id: &BranchId,
        weight: f64,
    ) -> FinalityResult<PropagationResult> {
        let Some(branch) = self.ledger.branch_metadata(branch_id) else {
            debug!(branch_id = %branch_id, "Unknown branch");
            return Ok(PropagationResult::empty());
        };
        if branch.kind() != BranchKind::Conflict {
            warn!(branch_id = %branch_id, kind = ?branch.kind(), "Unsupported branch type");
            return Err(FinalityError::UnsupportedBranchType {
                branch_id: *branch_id,
                kind: branch.kind(),
            });
        }

        let candidate = self.config.translate_branch(branch_id, weight);
        if candidate == GradeOfFinality::None {
            return Ok(PropagationResult::empty());
        }

        let mut result = PropagationResult::empty();
        let visited = Walker::new().walk([branch_id.transaction_id()], |transaction_id| {
            self.propagate_to_transaction(transaction_id, branch_id, candidate, &mut result)
        });

        if branch
            .raise_grade_of_finality(candidate)
            .crossed(self.config.branch_confirmed_level)
        {
            self.log_branch_confirmed(&branch);
            self.emit(ConfirmationEvent::BranchConfirmed(*branch_id), &mut result);
        }

        debug!(
            branch_id = %branch_id,
            grade = ?candidate,
            visited,
            transactions = result.transactions_updated,
            "Branch propagated"
        );
        Ok(result)
    }
}

impl<L, W, P> ConfirmationOracle for FinalityGadget<L, W, P>
where
    L: Ledger,
    W: ApprovalWeightSource,
    P: ConfirmationPublisher,
{
    fn is_marker_confirmed(&self, marker: &Marker) -> bool {
        self.ledger
            .resolve_marker(marker)
            .is_some_and(|message_id| self.is_message_confirmed(&message_id))
    }

    fn is_message_confirmed(&self, message_id: &MessageId) -> bool {
        self.ledger
            .message_metadata(message_id)
            .is_some_and(|m| m.grade_of_finality() >= self.config.message_confirmed_level)
    }

    fn is_branch_confirmed(&self, branch_id: &BranchId) -> bool {
        match self.branch_grade_of_finality(branch_id) {
            Ok(grade) => grade >= self.config.branch_confirmed_level,
            Err(e) => {
                debug!(error = %e, "Branch confirmation unknown");
                false
            }
        }
    }

    fn is_transaction_confirmed(&self, transaction_id: &TransactionId) -> bool {
        self.ledger
            .transaction_metadata(transaction_id)
            .is_some_and(|t| t.grade_of_finality() >= self.config.branch_confirmed_level)
    }

    fn is_output_confirmed(&self, output_id: &OutputId) -> bool {
        self.ledger
            .output_metadata(output_id)
            .is_some_and(|o| o.grade_of_finality() >= self.config.branch_confirmed_level)
    }

    fn is_transaction_rejected(&self, _transaction_id: &TransactionId) -> bool {
        false
    }

    fn is_branch_rejected(&self, _branch_id: &BranchId) -> bool {
        false
    }
}
