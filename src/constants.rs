//! Application-wide constants
//!
//! Default values for the balance poller, the ledger client and the metrics
//! endpoint live here so they are easy to find and modify.

/// Native token constants
pub mod token {
    /// Lamports per SOL, the divisor between minor units and display units
    pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

    /// Symbol shown next to balances
    pub const DEFAULT_SYMBOL: &str = "SOL";

    /// Fraction digits shown for balances
    pub const DEFAULT_DISPLAY_DECIMALS: usize = 4;
}

/// Time-related constants
pub mod time {
    /// Interval between balance polls (in seconds)
    pub const BALANCE_POLL_INTERVAL_SECS: u64 = 15;

    /// Timeout for a single balance lookup (in seconds)
    pub const BALANCE_FETCH_TIMEOUT_SECS: u64 = 10;
}

/// Network-related constants
pub mod network {
    /// Name shown on the dashboard for the default network
    pub const DEFAULT_NETWORK_NAME: &str = "solana-mainnet";

    /// Public Solana mainnet RPC endpoint
    pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

    /// Commitment level used for balance queries
    pub const DEFAULT_COMMITMENT: &str = "confirmed";
}

/// Metrics-related constants
pub mod metrics {
    /// Port for Prometheus metrics server
    pub const METRICS_SERVER_PORT: u16 = 9090;
}
