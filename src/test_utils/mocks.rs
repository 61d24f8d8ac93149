//! Mock implementations for testing

use crate::ledger::{LedgerError, LedgerQuery};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Duration;
use tokio::sync::watch;

/// Scriptable in-memory ledger.
///
/// Balances and failures are set per account. An account can be held so its
/// lookups block until released, which lets tests finish a fetch after the
/// poller has moved on.
#[derive(Debug, Default)]
pub struct MockLedger {
    balances: RwLock<HashMap<String, u64>>,
    failing: RwLock<HashSet<String>>,
    gates: RwLock<HashMap<String, watch::Sender<bool>>>,
    calls: RwLock<Vec<String>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, account_id: &str, minor_units: u64) -> Self {
        self.set_balance(account_id, minor_units);
        self
    }

    pub fn set_balance(&self, account_id: &str, minor_units: u64) {
        self.balances
            .write()
            .unwrap()
            .insert(account_id.to_string(), minor_units);
    }

    /// Make lookups for `account_id` fail until [`MockLedger::recover`]
    pub fn fail(&self, account_id: &str) {
        self.failing.write().unwrap().insert(account_id.to_string());
    }

    pub fn recover(&self, account_id: &str) {
        self.failing.write().unwrap().remove(account_id);
    }

    /// Block lookups for `account_id` until [`MockLedger::release`]
    pub fn hold(&self, account_id: &str) {
        let (tx, _rx) = watch::channel(false);
        self.gates
            .write()
            .unwrap()
            .insert(account_id.to_string(), tx);
    }

    pub fn release(&self, account_id: &str) {
        if let Some(gate) = self.gates.write().unwrap().remove(account_id) {
            gate.send_replace(true);
        }
    }

    /// Accounts looked up so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self, account_id: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.as_str() == account_id)
            .count()
    }

    /// Wait until `account_id` has been looked up at least `count` times
    pub async fn wait_for_calls(&self, account_id: &str, count: usize) {
        for _ in 0..1000 {
            if self.call_count(account_id) >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!(
            "expected {} lookups for {}, saw {:?}",
            count,
            account_id,
            self.calls()
        );
    }
}

#[async_trait::async_trait]
impl LedgerQuery for MockLedger {
    async fn get_balance(&self, account_id: &str) -> Result<u64, LedgerError> {
        self.calls.write().unwrap().push(account_id.to_string());

        let gate = self
            .gates
            .read()
            .unwrap()
            .get(account_id)
            .map(|tx| tx.subscribe());
        if let Some(mut gate) = gate {
            // A dropped gate counts as released
            let _ = gate.wait_for(|open| *open).await;
        }

        if self.failing.read().unwrap().contains(account_id) {
            return Err(LedgerError::Transport("Mock ledger failure".to_string()));
        }

        self.balances
            .read()
            .unwrap()
            .get(account_id)
            .copied()
            .ok_or_else(|| LedgerError::Rpc {
                code: -32602,
                message: format!("Unknown account: {}", account_id),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

