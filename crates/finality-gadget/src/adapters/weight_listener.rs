//! Weight update listener
//!
//! Drains approval-weight signals from a channel into the gadget.

use super::approval_weight::InMemoryApprovalWeights;
use crate::events::WeightUpdate;
use crate::ports::inbound::{Gadget, PropagationResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Totals over the lifetime of a listener.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Updates the gadget accepted
    pub processed: usize,
    /// Updates the gadget returned an error for
    pub rejected: usize,
    /// Sum of all propagation results
    pub propagation: PropagationResult,
}

/// Feeds [`WeightUpdate`]s into a [`Gadget`].
pub struct WeightUpdateListener<G>
where
    G: Gadget,
{
    gadget: Arc<G>,
    updates: mpsc::Receiver<WeightUpdate>,
    weights: Option<Arc<InMemoryApprovalWeights>>,
}

impl<G> WeightUpdateListener<G>
where
    G: Gadget,
{
    pub fn new(gadget: Arc<G>, updates: mpsc::Receiver<WeightUpdate>) -> Self {
        Self {
            gadget,
            updates,
            weights: None,
        }
    }

    /// Also record branch weights in `weights` before each update is handled,
    /// so payload cascades see the latest branch weight.
    pub fn with_weights(mut self, weights: Arc<InMemoryApprovalWeights>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Process updates until every sender is dropped.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) -> ListenerStats {
        info!("Weight update listener started");
        let mut stats = ListenerStats::default();

        while let Some(update) = self.updates.recv().await {
            if let Some(weights) = &self.weights {
                weights.apply(&update);
            }

            match self.gadget.process_weight_update(&update) {
                Ok(result) => {
                    debug!(?update, ?result, "Weight update applied");
                    stats.processed += 1;
                    stats.propagation += result;
                }
                Err(e) => {
                    warn!(?update, error = %e, "Weight update rejected");
                    stats.rejected += 1;
                }
            }
        }

        info!(
            processed = stats.processed,
            rejected = stats.rejected,
            "Weight update channel closed, listener stopped"
        );
        stats
    }
}
