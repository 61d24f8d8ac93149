use thiserror::Error;

/// Errors that can occur while querying the ledger for a balance
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Balance lookup timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP error with status code: {0}")]
    HttpStatus(u16),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Asynchronous balance lookup against a remote ledger
#[async_trait::async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Fetch the native balance of `account_id` in minor units
    async fn get_balance(&self, account_id: &str) -> Result<u64, LedgerError>;

    /// Get the name of this ledger backend
    fn name(&self) -> &str;
}
