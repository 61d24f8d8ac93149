use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::ledger::LedgerError;

/// A single balance observation for one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReading {
    amount_minor_units: u64,
    display_amount: f64,
    fetched_at: DateTime<Utc>,
}

impl BalanceReading {
    /// Builds a reading from raw minor units; the display amount is always
    /// `amount_minor_units / minor_units_per_token`
    pub fn from_minor_units(amount_minor_units: u64, minor_units_per_token: u64) -> Self {
        let divisor = minor_units_per_token.max(1);
        Self {
            amount_minor_units,
            display_amount: amount_minor_units as f64 / divisor as f64,
            fetched_at: Utc::now(),
        }
    }

    pub fn amount_minor_units(&self) -> u64 {
        self.amount_minor_units
    }

    pub fn display_amount(&self) -> f64 {
        self.display_amount
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Display amount with a fixed number of fraction digits
    pub fn format(&self, decimals: usize) -> String {
        format!("{:.*}", decimals, self.display_amount)
    }
}

/// Lifecycle of the on-screen balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    /// No session, or the last lookup failed
    Unknown,
    /// Polling started but no reading has arrived yet
    Loading,
    /// A reading for the current account is shown
    Ready,
}

/// Read-only state rendered by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    status: DisplayStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount_minor_units: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_id: Option<String>,
}

impl DisplayState {
    pub fn unknown(account_id: Option<&str>) -> Self {
        Self {
            status: DisplayStatus::Unknown,
            value: None,
            amount_minor_units: None,
            account_id: account_id.map(str::to_owned),
        }
    }

    pub fn loading(account_id: &str) -> Self {
        Self {
            status: DisplayStatus::Loading,
            value: None,
            amount_minor_units: None,
            account_id: Some(account_id.to_string()),
        }
    }

    pub fn ready(account_id: &str, reading: &BalanceReading) -> Self {
        Self {
            status: DisplayStatus::Ready,
            value: Some(reading.display_amount()),
            amount_minor_units: Some(reading.amount_minor_units()),
            account_id: Some(account_id.to_string()),
        }
    }

    pub fn status(&self) -> DisplayStatus {
        self.status
    }

    /// Display amount, present only when the status is `Ready`
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn amount_minor_units(&self) -> Option<u64> {
        self.amount_minor_units
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.status == DisplayStatus::Ready
    }

    /// Value with a fixed number of fraction digits
    pub fn formatted_value(&self, decimals: usize) -> Option<String> {
        self.value.map(|v| format!("{:.*}", decimals, v))
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::unknown(None)
    }
}

/// The only failure the poller knows: no balance can be shown right now
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BalanceUnavailable {
    #[error("Balance unavailable: no wallet session")]
    NoSession,

    #[error("Balance unavailable: {0}")]
    Ledger(#[from] LedgerError),
}
