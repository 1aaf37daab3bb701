// Wire types of the ledger RPC boundary.
//
// Params borrow through Cow so that call sites never clone just to build a
// request body.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{
    crypto::{Address, TxHash},
    transaction::TransactionEnvelope,
    value::ScValue,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAccountParams<'a> {
    pub address: Cow<'a, Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAccountResult {
    pub id: Address,
    #[serde(with = "crate::utils::u64_string")]
    pub sequence: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateTransactionParams<'a> {
    pub transaction: Cow<'a, TransactionEnvelope>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulateTransactionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<ScValue>,
    // resource fee the execution would need, in stroops
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_fee: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendTransactionParams<'a> {
    // the signed wire payload, forwarded untouched
    pub transaction: Cow<'a, str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendTransactionResult {
    pub hash: TxHash,
    pub status: SendStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTransactionParams<'a> {
    pub hash: Cow<'a, TxHash>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    NotFound,
    Success,
    Failed,
}

// Execution metadata of an applied transaction. The contract return value
// lives here, not in the top-level result code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SorobanMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<ScValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soroban_meta: Option<SorobanMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTransactionResult {
    pub status: TransactionStatus,
    // top-level result code and charged fee: useful for display,
    // never the place to read a contract return value from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_charged: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_meta: Option<TransactionMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<u64>,
}

impl GetTransactionResult {
    pub fn not_found() -> Self {
        Self {
            status: TransactionStatus::NotFound,
            result_code: None,
            fee_charged: None,
            result_meta: None,
            ledger: None,
        }
    }
}
