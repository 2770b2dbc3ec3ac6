//! Tangle builders shared by integration tests and benchmarks.

use finality_gadget::adapters::{
    EventBusConfirmationPublisher, InMemoryApprovalWeights, InMemoryTangle, NewMessage,
    NewTransaction, RecordingConfirmationPublisher,
};
use finality_gadget::{FinalityConfig, FinalityGadget};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use shared_bus::InMemoryEventBus;
use shared_types::{BranchId, Marker, MessageId, OutputId, TransactionId};
use std::sync::{Arc, Once};
use tangle_telemetry::{init_logging, TelemetryConfig};

pub type BusGadget =
    FinalityGadget<InMemoryTangle, InMemoryApprovalWeights, EventBusConfirmationPublisher>;

pub type RecordingGadget =
    FinalityGadget<InMemoryTangle, InMemoryApprovalWeights, RecordingConfirmationPublisher>;

/// Install the log subscriber once per test binary. Defaults to `warn`.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let config = TelemetryConfig::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| (key == "FG_LOG_LEVEL").then(|| "warn".to_string()))
        });
        // A subscriber may already be installed by the harness
        let _ = init_logging(&config);
    });
}

/// Gadget wired to a recording publisher.
pub struct RecordingSetup {
    pub tangle: Arc<InMemoryTangle>,
    pub weights: Arc<InMemoryApprovalWeights>,
    pub events: Arc<RecordingConfirmationPublisher>,
    pub gadget: Arc<RecordingGadget>,
}

impl RecordingSetup {
    pub fn new(config: FinalityConfig) -> Self {
        let tangle = Arc::new(InMemoryTangle::new());
        let weights = Arc::new(InMemoryApprovalWeights::new());
        let events = Arc::new(RecordingConfirmationPublisher::new());
        let gadget = Arc::new(FinalityGadget::new(
            config,
            Arc::clone(&tangle),
            Arc::clone(&weights),
            Arc::clone(&events),
        ));
        Self {
            tangle,
            weights,
            events,
            gadget,
        }
    }
}

/// Gadget wired to a shared event bus.
pub struct BusSetup {
    pub tangle: Arc<InMemoryTangle>,
    pub weights: Arc<InMemoryApprovalWeights>,
    pub bus: Arc<InMemoryEventBus>,
    pub gadget: Arc<BusGadget>,
}

impl BusSetup {
    pub fn new(config: FinalityConfig) -> Self {
        let tangle = Arc::new(InMemoryTangle::new());
        let weights = Arc::new(InMemoryApprovalWeights::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let gadget = Arc::new(FinalityGadget::new(
            config,
            Arc::clone(&tangle),
            Arc::clone(&weights),
            Arc::new(EventBusConfirmationPublisher::new(Arc::clone(&bus))),
        ));
        Self {
            tangle,
            weights,
            bus,
            gadget,
        }
    }
}

/// A linear chain of messages, each carrying one transaction.
pub struct Chain {
    pub messages: Vec<MessageId>,
    pub transactions: Vec<TransactionId>,
    /// Every marker in the chain, oldest first. The last one sits on the tip.
    pub markers: Vec<Marker>,
}

impl Chain {
    pub fn tip_marker(&self) -> Marker {
        self.markers[self.markers.len() - 1]
    }
}

/// Book a chain of `length` messages.
///
/// Message `i` has message `i - 1` as its only strong parent and carries
/// transaction `i`, which spends the single output of transaction `i - 1`.
/// Every `marker_every`-th message and the tip get a marker in sequence 0.
pub fn build_chain(tangle: &InMemoryTangle, length: u64, marker_every: u64) -> Chain {
    let mut chain = Chain {
        messages: Vec::new(),
        transactions: Vec::new(),
        markers: Vec::new(),
    };

    for i in 1..=length {
        let transaction_id = TransactionId::from_u64(i);
        let mut transaction = NewTransaction::new(transaction_id);
        if i > 1 {
            transaction = transaction.inputs([OutputId::new(TransactionId::from_u64(i - 1), 0)]);
        }
        tangle
            .book_transaction(transaction)
            .expect("transaction booking");

        let message_id = MessageId::from_u64(i);
        let mut message = NewMessage::new(message_id).payload(transaction_id);
        if i > 1 {
            message = message.strong_parents([MessageId::from_u64(i - 1)]);
        }
        if i % marker_every == 0 || i == length {
            let marker = Marker::new(0, i);
            message = message.marker(marker);
            chain.markers.push(marker);
        }
        tangle.book_message(message);

        chain.messages.push(message_id);
        chain.transactions.push(transaction_id);
    }
    chain
}

/// A conflict branch whose transactions form a spend chain.
pub struct BranchChain {
    pub branch_id: BranchId,
    /// Transactions inside the branch, root first.
    pub transactions: Vec<TransactionId>,
    /// One attachment per transaction, same order.
    pub attachments: Vec<MessageId>,
}

/// Book a conflicting transaction followed by `length - 1` transactions that
/// inherit its branch. Transaction and message IDs start at `first_id`.
pub fn build_branch_chain(tangle: &InMemoryTangle, first_id: u64, length: u64) -> BranchChain {
    let genesis = TransactionId::from_u64(first_id);
    tangle
        .book_transaction(NewTransaction::new(genesis))
        .expect("transaction booking");

    let root = TransactionId::from_u64(first_id + 1);
    tangle
        .book_transaction(
            NewTransaction::new(root)
                .inputs([OutputId::new(genesis, 0)])
                .conflicting(),
        )
        .expect("transaction booking");

    let mut transactions = vec![root];
    for n in 1..length {
        let id = TransactionId::from_u64(first_id + 1 + n);
        let spent = OutputId::new(transactions[transactions.len() - 1], 0);
        tangle
            .book_transaction(NewTransaction::new(id).inputs([spent]))
            .expect("transaction booking");
        transactions.push(id);
    }

    let attachments = transactions
        .iter()
        .enumerate()
        .map(|(i, transaction_id)| {
            let message_id = MessageId::from_u64(first_id + i as u64);
            tangle.book_message(NewMessage::new(message_id).payload(*transaction_id));
            message_id
        })
        .collect();

    BranchChain {
        branch_id: BranchId::from(root),
        transactions,
        attachments,
    }
}

/// A randomly wired message DAG.
pub struct RandomDag {
    pub messages: Vec<MessageId>,
    pub markers: Vec<Marker>,
}

/// Book `size` messages, each with one to three strong parents drawn from the
/// previous sixteen messages, and a payload transaction of its own. Every
/// seventh message and the tip carry a marker in sequence 1.
pub fn build_random_dag(tangle: &InMemoryTangle, size: u64, seed: u64) -> RandomDag {
    const WINDOW: usize = 16;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut dag = RandomDag {
        messages: Vec::new(),
        markers: Vec::new(),
    };

    for i in 1..=size {
        let transaction_id = TransactionId::from_u64(i);
        tangle
            .book_transaction(NewTransaction::new(transaction_id).outputs(2))
            .expect("transaction booking");

        let message_id = MessageId::from_u64(i);
        let mut message = NewMessage::new(message_id).payload(transaction_id);

        let window_start = dag.messages.len().saturating_sub(WINDOW);
        let window = &dag.messages[window_start..];
        if !window.is_empty() {
            let count = rng.gen_range(1..=window.len().min(3));
            let parents = sample(&mut rng, window.len(), count)
                .into_iter()
                .map(|index| window[index]);
            message = message.strong_parents(parents);
        }

        if i % 7 == 0 || i == size {
            let marker = Marker::new(1, i);
            message = message.marker(marker);
            dag.markers.push(marker);
        }

        tangle.book_message(message);
        dag.messages.push(message_id);
    }
    dag
}
