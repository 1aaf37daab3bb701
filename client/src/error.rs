use nota_common::{crypto::AddressError, crypto::TxHash, rpc::JsonRPCError, value::CodecError};
use thiserror::Error;

/// The outcome taxonomy of every public operation.
///
/// Callers branch on the variant, not on message text: a `UserRejected` is
/// silently dismissed by a UI, a `NetworkFailed` is retried after rebuild, a
/// `Timeout` leaves the transaction fate unknown and must not be reported as
/// a failure.
#[derive(Debug, Error)]
pub enum ClientError {
    // malformed input, caught before any network call
    #[error("Invalid input: {}", _0)]
    ValidationFailed(String),
    #[error("The user rejected the signing request")]
    UserRejected,
    // transport failure reaching the signer or the RPC service
    #[error("Network failure: {}", _0)]
    NetworkFailed(String),
    // the ledger evaluated the request and refused it
    #[error("Ledger rejected the operation: {}", _0)]
    LedgerRejected(String),
    // polling budget exhausted without a terminal status: indeterminate
    #[error("No terminal status for transaction {} within the polling budget", _0)]
    Timeout(TxHash),
}

impl From<AddressError> for ClientError {
    fn from(error: AddressError) -> Self {
        Self::ValidationFailed(error.to_string())
    }
}

impl From<CodecError> for ClientError {
    fn from(error: CodecError) -> Self {
        Self::ValidationFailed(error.to_string())
    }
}

impl From<JsonRPCError> for ClientError {
    // Classify RPC failures at the boundary: a server-side error means the
    // request arrived and was refused, anything else is transport
    fn from(error: JsonRPCError) -> Self {
        match error {
            JsonRPCError::ServerError { message, .. } => Self::LedgerRejected(message),
            other => Self::NetworkFailed(other.to_string()),
        }
    }
}
