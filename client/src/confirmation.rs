use std::time::Duration;

use log::{debug, trace, warn};
use nota_common::{
    api::{GetTransactionResult, SendStatus, TransactionStatus},
    crypto::TxHash,
    transaction::SignedEnvelope,
};
use tokio::time::sleep;

use crate::{
    config::{MAX_POLL_ATTEMPTS, POLL_INTERVAL_SECS},
    error::ClientError,
    ledger_api::LedgerApi,
};

// Polling budget applied after submission.
// Injectable so the engine is testable without real time: tests use a zero
// interval and count attempts on the mocked RPC boundary.
#[derive(Debug, Clone)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub max_attempts: usize,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// Drives a signed envelope through `SUBMITTED` to a terminal state.
///
/// The lifecycle per mutating operation is
/// `BUILT -> SIGNED -> SUBMITTED -> {CONFIRMED_SUCCESS | CONFIRMED_FAILURE |
/// TIMED_OUT}`; this engine owns the last arrow.
pub struct ConfirmationEngine<'a> {
    api: &'a dyn LedgerApi,
    policy: ConfirmationPolicy,
}

impl<'a> ConfirmationEngine<'a> {
    pub fn new(api: &'a dyn LedgerApi) -> Self {
        Self::with_policy(api, ConfirmationPolicy::default())
    }

    pub fn with_policy(api: &'a dyn LedgerApi, policy: ConfirmationPolicy) -> Self {
        Self { api, policy }
    }

    /// Single send, then bounded polling.
    ///
    /// The send is never retried: a second send of the same envelope would
    /// spend the same sequence number. On a transport failure here the
    /// caller must rebuild with a fresh sequence instead of resending.
    pub async fn submit_and_confirm(
        &self,
        signed: &SignedEnvelope,
    ) -> Result<GetTransactionResult, ClientError> {
        let submission = self.api.send_transaction(signed).await?;

        match submission.status {
            SendStatus::Pending | SendStatus::Duplicate => {}
            SendStatus::TryAgainLater => {
                return Err(ClientError::LedgerRejected(
                    "transaction queue is full, rebuild and retry later".to_owned(),
                ))
            }
            SendStatus::Error => {
                let reason = submission
                    .error_message
                    .unwrap_or_else(|| "submission refused".to_owned());
                return Err(ClientError::LedgerRejected(reason));
            }
        }

        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "Transaction {} submitted, polling for finality",
                submission.hash
            );
        }
        self.wait_for_finality(&submission.hash).await
    }

    /// Poll until the ledger reports a terminal status or the budget runs out.
    ///
    /// A lookup error only means the hash is not indexed yet, so it counts
    /// as "not yet confirmed". A confirmed failure is terminal: the sequence
    /// number is consumed, retrying cannot change the outcome.
    pub async fn wait_for_finality(
        &self,
        hash: &TxHash,
    ) -> Result<GetTransactionResult, ClientError> {
        for attempt in 1..=self.policy.max_attempts {
            sleep(self.policy.poll_interval).await;

            if log::log_enabled!(log::Level::Trace) {
                trace!(
                    "get_transaction {} (attempt {}/{})",
                    hash,
                    attempt,
                    self.policy.max_attempts
                );
            }

            let result = match self.api.get_transaction(hash).await {
                Ok(result) => result,
                Err(error) => {
                    debug!("Transaction {} not yet indexed: {}", hash, error);
                    continue;
                }
            };

            match result.status {
                TransactionStatus::NotFound => continue,
                TransactionStatus::Success => {
                    if log::log_enabled!(log::Level::Debug) {
                        debug!(
                            "Transaction {} confirmed after {} attempt(s)",
                            hash, attempt
                        );
                    }
                    return Ok(result);
                }
                TransactionStatus::Failed => {
                    let code = result.result_code.unwrap_or_else(|| "unknown".to_owned());
                    return Err(ClientError::LedgerRejected(format!(
                        "transaction {} failed on ledger with code {}",
                        hash, code
                    )));
                }
            }
        }

        warn!(
            "No terminal status for {} after {} attempts, fate unknown",
            hash, self.policy.max_attempts
        );
        Err(ClientError::Timeout(hash.clone()))
    }
}
