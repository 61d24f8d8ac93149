use thiserror::Error;

#[derive(Debug, Error)]
pub enum NovaPayError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::parser::ConfigError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] crate::ledger::LedgerError),

    #[error("Balance error: {0}")]
    Balance(#[from] crate::balance::BalanceUnavailable),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
