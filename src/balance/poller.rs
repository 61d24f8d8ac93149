use crate::balance::models::{BalanceReading, BalanceUnavailable, DisplayState};
use crate::config::models::{NetworkConfig, PollerConfig};
use crate::constants::{time, token};
use crate::ledger::{LedgerError, LedgerQuery};
use crate::metrics::BalanceMetrics;
use crate::session::{short_key, WalletSessionSource};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Timing and conversion settings for a [`BalancePoller`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerSettings {
    /// Time between polls
    pub interval: Duration,
    /// Upper bound for a single balance lookup
    pub fetch_timeout: Duration,
    /// Minor units per whole token
    pub minor_units_per_token: u64,
}

impl PollerSettings {
    pub fn from_config(poller: &PollerConfig, network: &NetworkConfig) -> Self {
        Self {
            interval: Duration::from_secs(poller.interval_secs),
            fetch_timeout: Duration::from_secs(network.request_timeout_secs),
            minor_units_per_token: poller.minor_units_per_token,
        }
    }
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(time::BALANCE_POLL_INTERVAL_SECS),
            fetch_timeout: Duration::from_secs(time::BALANCE_FETCH_TIMEOUT_SECS),
            minor_units_per_token: token::LAMPORTS_PER_SOL,
        }
    }
}

/// Observable lifecycle of a poller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerStatus {
    Idle,
    Polling(String),
}

/// Identifies the cycle a fetch belongs to. A result is applied only while
/// the poller is still on the same generation and account.
#[derive(Debug, Clone)]
struct FetchTicket {
    generation: u64,
    account_id: String,
}

enum Phase {
    Idle,
    Polling {
        account_id: String,
        task: JoinHandle<()>,
    },
}

struct CycleState {
    generation: u64,
    phase: Phase,
}

impl CycleState {
    /// Aborts the running cycle, if any. Always advances the generation so
    /// in-flight fetches of the old cycle become stale.
    fn cancel(&mut self) -> Option<String> {
        self.generation += 1;
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Polling { account_id, task } => {
                task.abort();
                Some(account_id)
            }
            Phase::Idle => None,
        }
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        match &self.phase {
            Phase::Polling { account_id, .. } => {
                self.generation == ticket.generation && *account_id == ticket.account_id
            }
            Phase::Idle => false,
        }
    }
}

struct PollerInner {
    ledger: Arc<dyn LedgerQuery>,
    settings: PollerSettings,
    display: watch::Sender<DisplayState>,
    cycle: Mutex<CycleState>,
}

impl PollerInner {
    fn lock_cycle(&self) -> MutexGuard<'_, CycleState> {
        self.cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn fetch(&self, ticket: &FetchTicket) -> Result<BalanceReading, BalanceUnavailable> {
        let started = Instant::now();
        let lookup = self.ledger.get_balance(&ticket.account_id);

        let outcome = match timeout(self.settings.fetch_timeout, lookup).await {
            Ok(Ok(minor_units)) => Ok(BalanceReading::from_minor_units(
                minor_units,
                self.settings.minor_units_per_token,
            )),
            Ok(Err(e)) => Err(BalanceUnavailable::from(e)),
            Err(_) => Err(BalanceUnavailable::from(LedgerError::Timeout(
                self.settings.fetch_timeout.as_secs(),
            ))),
        };

        BalanceMetrics::record_fetch(
            self.ledger.name(),
            &outcome,
            started.elapsed().as_secs_f64(),
        );

        self.apply(ticket, &outcome);
        outcome
    }

    /// Writes a fetch outcome to the display unless the ticket is stale.
    /// The check and the write share one lock so an account switch cannot
    /// slip in between.
    fn apply(&self, ticket: &FetchTicket, outcome: &Result<BalanceReading, BalanceUnavailable>) {
        let cycle = self.lock_cycle();

        if !cycle.is_current(ticket) {
            debug!(
                "Discarding stale balance result for {} (generation {})",
                short_key(&ticket.account_id),
                ticket.generation
            );
            BalanceMetrics::record_stale_discard();
            return;
        }

        let next = match outcome {
            Ok(reading) => {
                debug!(
                    "Balance for {}: {} minor units ({})",
                    short_key(&ticket.account_id),
                    reading.amount_minor_units(),
                    reading.display_amount()
                );
                BalanceMetrics::set_balance(&ticket.account_id, reading.amount_minor_units());
                DisplayState::ready(&ticket.account_id, reading)
            }
            Err(e) => {
                warn!("{} for {}", e, short_key(&ticket.account_id));
                DisplayState::unknown(Some(&ticket.account_id))
            }
        };

        self.display.send_replace(next);
    }
}

impl Drop for PollerInner {
    fn drop(&mut self) {
        let cycle = self
            .cycle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = cycle.cancel() {
            BalanceMetrics::clear_balance(&previous);
            BalanceMetrics::set_polling(false);
        }
    }
}

/// Keeps a displayed balance fresh for the connected account.
///
/// Clones share one poller. The repeating cycle holds only a weak reference,
/// so dropping the last clone tears the cycle down. `start` and `stop` spawn
/// and abort Tokio tasks and must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct BalancePoller {
    inner: Arc<PollerInner>,
}

impl BalancePoller {
    /// Create an idle poller with an unknown display
    pub fn new(ledger: Arc<dyn LedgerQuery>, settings: PollerSettings) -> Self {
        let (display, _rx) = watch::channel(DisplayState::default());

        Self {
            inner: Arc::new(PollerInner {
                ledger,
                settings,
                display,
                cycle: Mutex::new(CycleState {
                    generation: 0,
                    phase: Phase::Idle,
                }),
            }),
        }
    }

    /// Start polling `account_id`, or show an unknown balance when there is
    /// no session. Any running cycle is cancelled first.
    pub fn start(&self, account_id: Option<&str>) {
        let mut cycle = self.inner.lock_cycle();

        if let Some(previous) = cycle.cancel() {
            debug!("Cancelled balance polling for {}", short_key(&previous));
            if account_id != Some(previous.as_str()) {
                BalanceMetrics::clear_balance(&previous);
            }
        }

        let Some(account_id) = account_id else {
            info!("No wallet session, balance unavailable");
            self.inner.display.send_replace(DisplayState::unknown(None));
            BalanceMetrics::set_polling(false);
            return;
        };

        self.inner
            .display
            .send_replace(DisplayState::loading(account_id));

        let ticket = FetchTicket {
            generation: cycle.generation,
            account_id: account_id.to_string(),
        };
        let task = tokio::spawn(run_cycle(
            Arc::downgrade(&self.inner),
            ticket,
            self.inner.settings.interval,
        ));

        cycle.phase = Phase::Polling {
            account_id: account_id.to_string(),
            task,
        };
        BalanceMetrics::set_polling(true);

        info!(
            "Starting balance polling for {} with {}s interval",
            short_key(account_id),
            self.inner.settings.interval.as_secs()
        );
    }

    /// Cancel the repeating cycle. Safe to call at any time, any number of
    /// times; the display is left as it is.
    pub fn stop(&self) {
        let mut cycle = self.inner.lock_cycle();

        match cycle.cancel() {
            Some(account_id) => {
                info!("Stopped balance polling for {}", short_key(&account_id));
                BalanceMetrics::clear_balance(&account_id);
                BalanceMetrics::set_polling(false);
            }
            None => debug!("Balance poller already idle"),
        }
    }

    /// Look up the balance of `account_id` once.
    ///
    /// The display is updated only if `account_id` is still being polled by
    /// the same cycle when the lookup completes; the outcome is returned
    /// either way.
    pub async fn fetch_once(&self, account_id: &str) -> Result<BalanceReading, BalanceUnavailable> {
        let ticket = FetchTicket {
            generation: self.inner.lock_cycle().generation,
            account_id: account_id.to_string(),
        };

        self.inner.fetch(&ticket).await
    }

    /// Fetch immediately for the account currently being polled
    pub async fn refresh(&self) -> Result<BalanceReading, BalanceUnavailable> {
        let ticket = {
            let cycle = self.inner.lock_cycle();
            match &cycle.phase {
                Phase::Polling { account_id, .. } => FetchTicket {
                    generation: cycle.generation,
                    account_id: account_id.clone(),
                },
                Phase::Idle => return Err(BalanceUnavailable::NoSession),
            }
        };

        self.inner.fetch(&ticket).await
    }

    /// Follow a wallet session: restart polling whenever the active account
    /// changes and stop once the session source is gone.
    pub fn follow<S>(&self, session: &S) -> JoinHandle<()>
    where
        S: WalletSessionSource + ?Sized,
    {
        let mut updates = session.subscribe();
        let poller = self.clone();

        tokio::spawn(async move {
            let mut active = updates
                .borrow_and_update()
                .active_account()
                .map(str::to_owned);
            poller.start(active.as_deref());

            while updates.changed().await.is_ok() {
                let next = updates
                    .borrow_and_update()
                    .active_account()
                    .map(str::to_owned);

                if next == active {
                    debug!("Wallet session notified without an account change");
                    continue;
                }

                info!("Wallet account changed, restarting balance polling");
                poller.start(next.as_deref());
                active = next;
            }

            debug!("Wallet session closed");
            poller.stop();
        })
    }

    /// Snapshot of the displayed state
    pub fn display(&self) -> DisplayState {
        self.inner.display.borrow().clone()
    }

    /// Receiver notified whenever the displayed state changes
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.inner.display.subscribe()
    }

    pub fn status(&self) -> PollerStatus {
        match &self.inner.lock_cycle().phase {
            Phase::Idle => PollerStatus::Idle,
            Phase::Polling { account_id, .. } => PollerStatus::Polling(account_id.clone()),
        }
    }

    pub fn settings(&self) -> &PollerSettings {
        &self.inner.settings
    }
}

/// Fixed-interval loop for one account. The first tick fires immediately.
async fn run_cycle(inner: Weak<PollerInner>, ticket: FetchTicket, period: Duration) {
    let mut ticker = interval(period.max(Duration::from_millis(1)));
    // A lookup that outlasts the period must not trigger catch-up ticks
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let Some(inner) = inner.upgrade() else {
            break;
        };
        // Failures are already reflected in the display
        let _ = inner.fetch(&ticket).await;
    }
}
