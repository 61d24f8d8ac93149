use crate::config::models::NetworkConfig;
use crate::ledger::models::{LedgerError, LedgerQuery};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Solana JSON-RPC balance lookup
pub struct SolanaRpcLedger {
    rpc_url: String,
    commitment: String,
    timeout_secs: u64,
    client: Client,
}

/// JSON-RPC envelope; exactly one of `result` or `error` is expected
#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<BalanceResult>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct BalanceResult {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl SolanaRpcLedger {
    /// Create a client for the configured network
    pub fn new(network: &NetworkConfig) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(network.request_timeout_secs))
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        Ok(Self {
            rpc_url: network.rpc_url.clone(),
            commitment: network.commitment.clone(),
            timeout_secs: network.request_timeout_secs,
            client,
        })
    }

    /// RPC endpoint this client talks to
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn request_body(&self, account_id: &str) -> serde_json::Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getBalance",
            "params": [account_id, { "commitment": self.commitment }],
        })
    }
}

#[async_trait::async_trait]
impl LedgerQuery for SolanaRpcLedger {
    async fn get_balance(&self, account_id: &str) -> Result<u64, LedgerError> {
        debug!("Requesting balance for {} from {}", account_id, self.rpc_url);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&self.request_body(account_id))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LedgerError::Timeout(self.timeout_secs)
                } else {
                    LedgerError::Transport(e.to_string())
                }
            })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("RPC rate limit exceeded at {}", self.rpc_url);
            return Err(LedgerError::RateLimited);
        }

        if !status.is_success() {
            error!(
                "HTTP error {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            );
            return Err(LedgerError::HttpStatus(status.as_u16()));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Malformed(e.to_string()))?;

        match (body.result, body.error) {
            (_, Some(err)) => Err(LedgerError::Rpc {
                code: err.code,
                message: err.message,
            }),
            (Some(result), None) => Ok(result.value),
            (None, None) => Err(LedgerError::Malformed(
                "response has neither result nor error".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        "solana-rpc"
    }
}
