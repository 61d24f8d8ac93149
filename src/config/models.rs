use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::metrics_config::MetricsConfig;
use crate::constants::{network, time, token};

/// The main configuration structure for the NovaPay dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NovaPayConfig {
    /// Ledger network the balances are read from
    #[serde(default)]
    #[validate]
    pub network: NetworkConfig,

    /// Balance polling behaviour
    #[serde(default)]
    #[validate]
    pub poller: PollerConfig,

    /// Metrics configuration
    #[serde(default)]
    #[validate]
    pub metrics: MetricsConfig,
}

/// Configuration for the ledger network
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NetworkConfig {
    /// Network name shown on the dashboard (e.g., "solana-mainnet")
    #[serde(default = "default_network_name")]
    #[validate(length(min = 1))]
    pub name: String,

    /// JSON-RPC URL for the network
    #[serde(default = "default_rpc_url")]
    #[validate(url)]
    pub rpc_url: String,

    /// Commitment level for balance queries ("processed", "confirmed" or "finalized")
    #[serde(default = "default_commitment")]
    #[validate(custom = "validate_commitment")]
    pub commitment: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: default_network_name(),
            rpc_url: default_rpc_url(),
            commitment: default_commitment(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Configuration for the balance poller
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PollerConfig {
    /// Seconds between balance polls (default: 15)
    #[serde(default = "default_interval")]
    #[validate(range(min = 1, max = 3600))]
    pub interval_secs: u64,

    /// Minor units per whole token (default: 1_000_000_000 lamports per SOL)
    #[serde(default = "default_minor_units_per_token")]
    #[validate(range(min = 1))]
    pub minor_units_per_token: u64,

    /// Fraction digits shown for balances
    #[serde(default = "default_display_decimals")]
    #[validate(range(max = 9))]
    pub display_decimals: usize,

    /// Token symbol shown next to balances
    #[serde(default = "default_token_symbol")]
    #[validate(length(min = 1, max = 12))]
    pub token_symbol: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            minor_units_per_token: default_minor_units_per_token(),
            display_decimals: default_display_decimals(),
            token_symbol: default_token_symbol(),
        }
    }
}

fn default_network_name() -> String {
    network::DEFAULT_NETWORK_NAME.to_string()
}

fn default_rpc_url() -> String {
    network::DEFAULT_RPC_URL.to_string()
}

fn default_commitment() -> String {
    network::DEFAULT_COMMITMENT.to_string()
}

fn default_request_timeout() -> u64 {
    time::BALANCE_FETCH_TIMEOUT_SECS
}

fn default_interval() -> u64 {
    time::BALANCE_POLL_INTERVAL_SECS
}

fn default_minor_units_per_token() -> u64 {
    token::LAMPORTS_PER_SOL
}

fn default_display_decimals() -> usize {
    token::DEFAULT_DISPLAY_DECIMALS
}

fn default_token_symbol() -> String {
    token::DEFAULT_SYMBOL.to_string()
}

fn validate_commitment(commitment: &str) -> Result<(), ValidationError> {
    match commitment {
        "processed" | "confirmed" | "finalized" => Ok(()),
        _ => Err(ValidationError::new(
            "commitment must be 'processed', 'confirmed', or 'finalized'",
        )),
    }
}
