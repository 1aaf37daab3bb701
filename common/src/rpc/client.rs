use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use log::trace;
use serde::{de::DeserializeOwned, Serialize};

use crate::rpc::{
    JsonRPCError, JsonRPCRequest, JsonRPCResponse, JsonRPCResult, JSON_RPC_VERSION,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// Plain JSON-RPC 2.0 over HTTPS POST.
// One request per call, no connection state beyond reqwest's pool.
pub struct HttpJsonRPCClient {
    client: reqwest::Client,
    target: String,
    count: AtomicUsize,
}

impl HttpJsonRPCClient {
    pub fn new(target: String) -> JsonRPCResult<Self> {
        Self::with(target, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with(target: String, timeout: Duration) -> JsonRPCResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            target,
            count: AtomicUsize::new(0),
        })
    }

    pub fn get_target(&self) -> &str {
        &self.target
    }

    fn next_id(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn call<T: DeserializeOwned>(&self, method: &str) -> JsonRPCResult<T> {
        self.request::<(), T>(method, None).await
    }

    pub async fn call_with<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> JsonRPCResult<T> {
        self.request(method, Some(params)).await
    }

    async fn request<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<&P>,
    ) -> JsonRPCResult<T> {
        let id = self.next_id();
        if log::log_enabled!(log::Level::Trace) {
            trace!("Sending request #{} to {}: {}", id, self.target, method);
        }

        let request = JsonRPCRequest {
            jsonrpc: JSON_RPC_VERSION,
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.target)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JsonRPCError::HttpStatus(status.as_u16()));
        }

        let response: JsonRPCResponse<T> = response.json().await?;
        if response.jsonrpc != JSON_RPC_VERSION {
            return Err(JsonRPCError::InvalidVersion(response.jsonrpc));
        }

        if let Some(error) = response.error {
            return Err(JsonRPCError::ServerError {
                code: error.code,
                message: error.message,
            });
        }

        response.result.ok_or(JsonRPCError::MissingResult)
    }
}
