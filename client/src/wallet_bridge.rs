use std::{fmt, sync::Arc};

use async_trait::async_trait;
use log::{debug, trace};
use nota_common::{
    crypto::Address,
    network::Network,
    transaction::{SignedEnvelope, TransactionEnvelope},
};

use crate::error::ClientError;

// Error payload coming back from a wallet implementation.
// Wallets are out of process and implementation defined: the textual
// message is the only field that may be relied on.
#[derive(Debug, Clone)]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderError {}

/// The wallet-extension boundary.
///
/// All calls are user paced and may sit behind a wallet prompt for an
/// arbitrary amount of time, which is why none of them carries a timeout.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn is_connected(&self) -> Result<bool, ProviderError>;

    // asks the wallet for permission, returns an opaque token
    async fn request_access(&self) -> Result<String, ProviderError>;

    // the raw identifier as the wallet reports it, unvalidated
    async fn get_address(&self) -> Result<String, ProviderError>;

    async fn sign_transaction(
        &self,
        envelope_wire: &str,
        network: &Network,
        account: &Address,
    ) -> Result<String, ProviderError>;
}

// Substrings that identify an explicit refusal by the user.
// Matching on message content is deliberate: wallet errors have no stable
// shape, but these fragments are stable across the implementations we speak to.
const REJECTION_MARKERS: &[&str] = &[
    "user rejected",
    "user declined",
    "request denied",
    "rejected by user",
];

// Substrings that identify an unreachable signer (extension missing or dead)
const UNREACHABLE_MARKERS: &[&str] = &[
    "not installed",
    "not available",
    "unreachable",
    "no response",
    "timed out",
    "connection",
];

/// Map a wallet-side failure onto the operation taxonomy.
///
/// The split is load bearing: a refusal is dismissed quietly by the caller,
/// an unreachable signer is worth an alarming message, anything else is a
/// malformed request on our side.
pub fn classify_provider_error(error: &ProviderError) -> ClientError {
    let message = error.message.to_lowercase();
    if REJECTION_MARKERS.iter().any(|marker| message.contains(marker)) {
        ClientError::UserRejected
    } else if UNREACHABLE_MARKERS.iter().any(|marker| message.contains(marker)) {
        ClientError::NetworkFailed(error.message.clone())
    } else {
        ClientError::ValidationFailed(error.message.clone())
    }
}

// Hands envelopes to the external signer and classifies whatever comes back
pub struct SignerBridge {
    provider: Arc<dyn WalletProvider>,
}

impl SignerBridge {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self { provider }
    }

    pub fn get_provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }

    // Request access if needed and return the validated wallet address
    pub async fn connected_address(&self) -> Result<Address, ClientError> {
        trace!("connected_address");
        let connected = self
            .provider
            .is_connected()
            .await
            .map_err(|e| classify_provider_error(&e))?;
        if !connected {
            debug!("Wallet not connected yet, requesting access");
            self.provider
                .request_access()
                .await
                .map_err(|e| classify_provider_error(&e))?;
        }

        let raw = self
            .provider
            .get_address()
            .await
            .map_err(|e| classify_provider_error(&e))?;
        raw.parse::<Address>().map_err(|e| {
            ClientError::ValidationFailed(format!("wallet returned an invalid address: {}", e))
        })
    }

    /// Hand the envelope over for signing.
    ///
    /// Suspends until the signer answers; there is deliberately no timeout
    /// on this step since the user may be reading a confirmation prompt.
    pub async fn sign(&self, envelope: &TransactionEnvelope) -> Result<SignedEnvelope, ClientError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("sign {}", envelope.invocation.function);
        }

        let wire = envelope
            .to_wire()
            .map_err(|e| ClientError::ValidationFailed(format!("unserializable envelope: {}", e)))?;

        match self
            .provider
            .sign_transaction(&wire, &envelope.network, &envelope.source)
            .await
        {
            Ok(signed_wire) => Ok(SignedEnvelope {
                envelope: envelope.clone(),
                signed_wire,
            }),
            Err(error) => {
                debug!("Signer refused envelope: {}", error);
                Err(classify_provider_error(&error))
            }
        }
    }
}
