//! Wallet session capability
//!
//! The wallet connection itself is owned by an external collaborator (a
//! browser extension, a hardware wallet, a test). This module models what the
//! dashboard needs from it: the current session and a way to observe changes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

/// Connection state and identity of the user's wallet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    pub connected: bool,
    pub account_id: Option<String>,
}

impl WalletSession {
    /// A connected session for `account_id`
    pub fn connected(account_id: impl Into<String>) -> Self {
        Self {
            connected: true,
            account_id: Some(account_id.into()),
        }
    }

    /// A disconnected session
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// The account balances should be shown for, if any
    pub fn active_account(&self) -> Option<&str> {
        if self.connected {
            self.account_id.as_deref()
        } else {
            None
        }
    }
}

/// Observer interface over an externally owned wallet session
pub trait WalletSessionSource: Send + Sync {
    /// Snapshot of the current session
    fn current(&self) -> WalletSession;

    /// Receiver notified on every session change
    fn subscribe(&self) -> watch::Receiver<WalletSession>;
}

/// Channel-backed session that the embedding UI drives
#[derive(Debug)]
pub struct SessionChannel {
    tx: watch::Sender<WalletSession>,
}

impl SessionChannel {
    /// Create a disconnected session
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(WalletSession::disconnected());
        Self { tx }
    }

    /// Connect `account_id`, replacing any previously connected account
    pub fn connect(&self, account_id: impl Into<String>) {
        let account_id = account_id.into();
        info!("Wallet connected: {}", short_key(&account_id));
        self.tx.send_replace(WalletSession::connected(account_id));
    }

    /// Disconnect the wallet
    pub fn disconnect(&self) {
        info!("Wallet disconnected");
        self.tx.send_replace(WalletSession::disconnected());
    }
}

impl Default for SessionChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletSessionSource for SessionChannel {
    fn current(&self) -> WalletSession {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.tx.subscribe()
    }
}

/// Shortens an account id to `abcd…wxyz` for display
pub fn short_key(account_id: &str) -> String {
    let chars: Vec<char> = account_id.chars().collect();
    if chars.len() <= 8 {
        return account_id.to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
