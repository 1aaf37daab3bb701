use serde::{Deserialize, Serialize};

use crate::{crypto::Address, network::Network, time::TimestampSeconds, value::ScValue};

// One contract function call with its already-encoded arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInvocation {
    pub contract: Address,
    pub function: String,
    pub args: Vec<ScValue>,
}

/// An unsigned transaction envelope.
///
/// Immutable once built: the prepare step produces a new envelope through
/// [`TransactionEnvelope::with_fee`] instead of mutating in place, and an
/// envelope is never reused after submission since its sequence number is
/// consumed either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    pub source: Address,
    #[serde(with = "crate::utils::u64_string")]
    pub sequence: u64,
    pub invocation: ContractInvocation,
    // fee ceiling in stroops
    pub fee: u64,
    pub network: Network,
    // ledger time after which the envelope is provably rejectable
    pub valid_until: TimestampSeconds,
}

impl TransactionEnvelope {
    // Serialized form handed to the external signer
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_wire(wire: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(wire)
    }

    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }
}

// An envelope together with the opaque signed payload the wallet returned.
// Only the payload travels to the RPC service; the envelope is kept for
// bookkeeping and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub envelope: TransactionEnvelope,
    pub signed_wire: String,
}
