//! NovaPay live balance dashboard
//!
//! Polls the native balance of a connected wallet from a Solana JSON-RPC
//! endpoint and exposes a read-only display state for rendering.

pub mod balance;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use balance::{BalancePoller, BalanceReading, BalanceUnavailable, DisplayState, DisplayStatus};
pub use error::NovaPayError;
pub use ledger::{LedgerError, LedgerQuery, SolanaRpcLedger};
pub use session::{SessionChannel, WalletSession, WalletSessionSource};
