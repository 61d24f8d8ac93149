use crate::balance::{BalanceReading, BalanceUnavailable};
use crate::ledger::LedgerError;
use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, register_int_counter,
    register_int_gauge, CounterVec, GaugeVec, HistogramVec, IntCounter, IntGauge,
};
use tracing::debug;

lazy_static! {
    /// Latest balance in minor units per account
    static ref BALANCE_MINOR_UNITS: GaugeVec = register_gauge_vec!(
        "novapay_balance_minor_units",
        "Latest wallet balance in minor units",
        &["account"]
    ).expect("Failed to create balance_minor_units metric");

    /// Balance lookups by outcome
    static ref BALANCE_FETCH_TOTAL: CounterVec = register_counter_vec!(
        "novapay_balance_fetch_total",
        "Balance lookups by outcome",
        &["ledger", "outcome"]
    ).expect("Failed to create balance_fetch_total metric");

    /// Balance lookup latency
    static ref BALANCE_FETCH_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "novapay_balance_fetch_duration_seconds",
        "Balance lookup latency in seconds",
        &["ledger"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).expect("Failed to create balance_fetch_duration_seconds metric");

    /// Results dropped because the account changed while they were in flight
    static ref STALE_FETCH_DISCARDED_TOTAL: IntCounter = register_int_counter!(
        "novapay_stale_fetch_discarded_total",
        "Balance results discarded by the staleness guard"
    ).expect("Failed to create stale_fetch_discarded_total metric");

    /// 1 while a polling cycle is running
    static ref POLLER_ACTIVE: IntGauge = register_int_gauge!(
        "novapay_poller_active",
        "Whether a balance polling cycle is running"
    ).expect("Failed to create poller_active metric");
}

/// Balance poller metrics collector
pub struct BalanceMetrics;

impl BalanceMetrics {
    /// Record the outcome of one balance lookup
    pub fn record_fetch(
        ledger: &str,
        outcome: &Result<BalanceReading, BalanceUnavailable>,
        duration_secs: f64,
    ) {
        BALANCE_FETCH_DURATION_SECONDS
            .with_label_values(&[ledger])
            .observe(duration_secs);

        BALANCE_FETCH_TOTAL
            .with_label_values(&[ledger, Self::outcome_label(outcome)])
            .inc();

        debug!(
            "Recorded {} balance lookup on {} in {:.3}s",
            Self::outcome_label(outcome),
            ledger,
            duration_secs
        );
    }

    /// Export the balance shown for `account_id`
    pub fn set_balance(account_id: &str, minor_units: u64) {
        BALANCE_MINOR_UNITS
            .with_label_values(&[account_id])
            .set(minor_units as f64);
    }

    /// Stop exporting the balance of an account that is no longer polled
    pub fn clear_balance(account_id: &str) {
        if BALANCE_MINOR_UNITS.remove_label_values(&[account_id]).is_ok() {
            debug!("Removed balance metric for {}", account_id);
        }
    }

    /// Latest exported balance for `account_id`, if any
    #[cfg(test)]
    pub(crate) fn exported_balance(account_id: &str) -> Option<f64> {
        prometheus::gather()
            .iter()
            .find(|f| f.get_name() == "novapay_balance_minor_units")?
            .get_metric()
            .iter()
            .find(|m| m.get_label().iter().any(|l| l.get_value() == account_id))
            .map(|m| m.get_gauge().get_value())
    }

    /// Record a result dropped by the staleness guard
    pub fn record_stale_discard() {
        STALE_FETCH_DISCARDED_TOTAL.inc();
    }

    pub fn set_polling(active: bool) {
        POLLER_ACTIVE.set(i64::from(active));
    }

    fn outcome_label(outcome: &Result<BalanceReading, BalanceUnavailable>) -> &'static str {
        match outcome {
            Ok(_) => "success",
            Err(BalanceUnavailable::Ledger(LedgerError::Timeout(_))) => "timeout",
            Err(BalanceUnavailable::Ledger(LedgerError::RateLimited)) => "rate_limited",
            Err(_) => "failure",
        }
    }
}
