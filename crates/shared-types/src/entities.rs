//! # Core Ledger Identifiers
//!
//! ## Clusters
//!
//! - **Message DAG**: `MessageId`, `Marker`
//! - **UTXO DAG**: `TransactionId`, `OutputId`
//! - **Conflict DAG**: `BranchId`

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte hash (e.g., Blake2b of the serialized entity).
pub type Hash = [u8; 32];

/// Number of leading bytes shown by the `Display` impls.
const SHORT_ID_BYTES: usize = 4;

fn write_short(f: &mut fmt::Formatter<'_>, prefix: &str, bytes: &Hash) -> fmt::Result {
    write!(f, "{}:{}", prefix, hex::encode(&bytes[..SHORT_ID_BYTES]))
}

/// Places `n` in the trailing eight bytes of an otherwise zeroed hash.
fn hash_from_u64(n: u64) -> Hash {
    let mut hash = [0u8; 32];
    hash[24..].copy_from_slice(&n.to_be_bytes());
    hash
}

// =============================================================================
// CLUSTER A: THE MESSAGE DAG
// =============================================================================

/// Unique identifier for a message in the message DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct MessageId(pub Hash);

impl MessageId {
    /// The empty message identifier (genesis reference).
    pub const EMPTY: Self = Self([0u8; 32]);

    /// Build an identifier from a sequence number (test fixtures, simulations).
    #[must_use]
    pub fn from_u64(n: u64) -> Self {
        Self(hash_from_u64(n))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_short(f, "msg", &self.0)
    }
}

/// A sparse checkpoint in the message DAG.
///
/// A marker is addressed by the sequence it belongs to and its index within
/// that sequence. It resolves to exactly one message through the marker index
/// of the message DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Marker {
    /// Sequence the marker belongs to.
    pub sequence_id: u64,
    /// Position of the marker inside its sequence.
    pub index: u64,
}

impl Marker {
    #[must_use]
    pub const fn new(sequence_id: u64, index: u64) -> Self {
        Self { sequence_id, index }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker({}, {})", self.sequence_id, self.index)
    }
}

// =============================================================================
// CLUSTER B: THE UTXO DAG
// =============================================================================

/// Unique identifier for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct TransactionId(pub Hash);

impl TransactionId {
    /// Build an identifier from a sequence number (test fixtures, simulations).
    #[must_use]
    pub fn from_u64(n: u64) -> Self {
        Self(hash_from_u64(n))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_short(f, "tx", &self.0)
    }
}

/// Identifier of an output: the creating transaction plus the output index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputId {
    /// Transaction that created the output.
    pub transaction_id: TransactionId,
    /// Index of the output within the creating transaction.
    pub index: u16,
}

impl OutputId {
    #[must_use]
    pub const fn new(transaction_id: TransactionId, index: u16) -> Self {
        Self {
            transaction_id,
            index,
        }
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.transaction_id, self.index)
    }
}

// =============================================================================
// CLUSTER C: THE CONFLICT DAG
// =============================================================================

/// Identifier of a conflict branch.
///
/// Conflict branches share their identifier with the transaction that created
/// them. The all-zero identifier is reserved for the master branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BranchId(pub Hash);

impl BranchId {
    /// The conflict-free master branch.
    pub const MASTER: Self = Self([0u8; 32]);

    /// Whether this is the master branch.
    #[must_use]
    pub fn is_master(&self) -> bool {
        *self == Self::MASTER
    }

    /// The transaction that defines this branch.
    #[must_use]
    pub const fn transaction_id(&self) -> TransactionId {
        TransactionId(self.0)
    }
}

impl Default for BranchId {
    fn default() -> Self {
        Self::MASTER
    }
}

impl From<TransactionId> for BranchId {
    fn from(transaction_id: TransactionId) -> Self {
        Self(transaction_id.0)
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_master() {
            return write!(f, "branch:master");
        }
        write_short(f, "branch", &self.0)
    }
}
