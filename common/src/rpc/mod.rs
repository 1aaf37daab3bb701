pub mod client;
mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSON_RPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Serialize)]
pub struct JsonRPCRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: usize,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<&'a P>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRPCErrorBody {
    pub code: i16,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRPCResponse<T> {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub result: Option<T>,
    pub error: Option<JsonRPCErrorBody>,
}

fn default_version() -> String {
    JSON_RPC_VERSION.to_owned()
}
