use std::borrow::Cow;

use async_trait::async_trait;
use log::trace;
use nota_common::{
    api::{
        GetAccountParams, GetAccountResult, GetTransactionParams, GetTransactionResult,
        SendTransactionParams, SendTransactionResult, SimulateTransactionParams,
        SimulateTransactionResult,
    },
    crypto::{Address, TxHash},
    rpc::{client::HttpJsonRPCClient, JsonRPCResult},
    transaction::{SignedEnvelope, TransactionEnvelope},
    utils::sanitize_rpc_address,
};

/// The ledger RPC boundary as a capability.
///
/// One production implementation talks JSON-RPC; tests inject deterministic
/// fakes so the whole submission/confirmation flow runs without a network.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn get_account(&self, address: &Address) -> JsonRPCResult<GetAccountResult>;

    async fn simulate_transaction(
        &self,
        transaction: &TransactionEnvelope,
    ) -> JsonRPCResult<SimulateTransactionResult>;

    async fn send_transaction(
        &self,
        transaction: &SignedEnvelope,
    ) -> JsonRPCResult<SendTransactionResult>;

    async fn get_transaction(&self, hash: &TxHash) -> JsonRPCResult<GetTransactionResult>;
}

pub struct RpcLedgerApi {
    client: HttpJsonRPCClient,
}

impl RpcLedgerApi {
    pub fn new(target: &str) -> JsonRPCResult<Self> {
        let client = HttpJsonRPCClient::new(sanitize_rpc_address(target))?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &HttpJsonRPCClient {
        &self.client
    }
}

#[async_trait]
impl LedgerApi for RpcLedgerApi {
    async fn get_account(&self, address: &Address) -> JsonRPCResult<GetAccountResult> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get_account {}", address);
        }
        self.client
            .call_with(
                "getAccount",
                &GetAccountParams {
                    address: Cow::Borrowed(address),
                },
            )
            .await
    }

    async fn simulate_transaction(
        &self,
        transaction: &TransactionEnvelope,
    ) -> JsonRPCResult<SimulateTransactionResult> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("simulate_transaction {}", transaction.invocation.function);
        }
        self.client
            .call_with(
                "simulateTransaction",
                &SimulateTransactionParams {
                    transaction: Cow::Borrowed(transaction),
                },
            )
            .await
    }

    async fn send_transaction(
        &self,
        transaction: &SignedEnvelope,
    ) -> JsonRPCResult<SendTransactionResult> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("send_transaction {}", transaction.envelope.invocation.function);
        }
        self.client
            .call_with(
                "sendTransaction",
                &SendTransactionParams {
                    transaction: Cow::Borrowed(transaction.signed_wire.as_str()),
                },
            )
            .await
    }

    async fn get_transaction(&self, hash: &TxHash) -> JsonRPCResult<GetTransactionResult> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get_transaction {}", hash);
        }
        self.client
            .call_with(
                "getTransaction",
                &GetTransactionParams {
                    hash: Cow::Borrowed(hash),
                },
            )
            .await
    }
}
