use novapay::balance::{BalancePoller, DisplayStatus, PollerSettings, PollerStatus};
use novapay::session::{SessionChannel, WalletSessionSource};
use novapay::test_utils::{wait_for_display, MockLedger};
use std::sync::Arc;
use std::time::Duration;

const LAMPORTS: u64 = 1_000_000_000;

fn poller_with(ledger: &Arc<MockLedger>) -> BalancePoller {
    BalancePoller::new(ledger.clone(), PollerSettings::default())
}

#[tokio::test]
async fn test_one_token_displays_four_decimals() {
    let ledger = Arc::new(MockLedger::new().with_balance("A", 1_000_000_000));
    let poller = poller_with(&ledger);

    poller.start(Some("A"));
    let state = wait_for_display(&poller, |s| s.is_ready()).await;

    assert_eq!(state.value(), Some(1.0));
    assert_eq!(state.formatted_value(4).as_deref(), Some("1.0000"));
    assert_eq!(state.amount_minor_units(), Some(1_000_000_000));
}

#[tokio::test]
async fn test_switching_accounts_never_shows_stale_balance() {
    let ledger = Arc::new(
        MockLedger::new()
            .with_balance("A", 5 * LAMPORTS)
            .with_balance("B", 2_500_000_000),
    );
    let poller = poller_with(&ledger);

    // A resolves normally
    poller.start(Some("A"));
    let state = wait_for_display(&poller, |s| s.is_ready()).await;
    assert_eq!(state.formatted_value(4).as_deref(), Some("5.0000"));

    // A second lookup for A is still in flight when the wallet switches to B
    ledger.hold("A");
    let in_flight = {
        let poller = poller.clone();
        tokio::spawn(async move { poller.fetch_once("A").await })
    };
    ledger.wait_for_calls("A", 2).await;

    poller.start(Some("B"));
    let mut display = poller.subscribe();
    assert_eq!(display.borrow_and_update().status(), DisplayStatus::Loading);
    assert_eq!(display.borrow().account_id(), Some("B"));

    let state = wait_for_display(&poller, |s| s.is_ready()).await;
    assert_eq!(state.account_id(), Some("B"));
    assert_eq!(state.formatted_value(4).as_deref(), Some("2.5000"));

    // The stale lookup completes with A's balance but must not reach the display
    ledger.release("A");
    let stale = in_flight.await.unwrap().unwrap();
    assert_eq!(stale.display_amount(), 5.0);

    let state = poller.display();
    assert_eq!(state.account_id(), Some("B"));
    assert_eq!(state.value(), Some(2.5));
}

#[tokio::test]
async fn test_stale_lookup_after_stop_is_discarded() {
    let ledger = Arc::new(MockLedger::new().with_balance("A", LAMPORTS));
    ledger.hold("A");
    let poller = poller_with(&ledger);

    poller.start(Some("A"));
    ledger.wait_for_calls("A", 1).await;
    let in_flight = {
        let poller = poller.clone();
        tokio::spawn(async move { poller.fetch_once("A").await })
    };
    ledger.wait_for_calls("A", 2).await;

    poller.stop();
    ledger.release("A");
    assert!(in_flight.await.unwrap().is_ok());

    assert_eq!(poller.display().status(), DisplayStatus::Loading);
    assert_eq!(poller.status(), PollerStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_polls_on_fixed_interval() {
    let ledger = Arc::new(MockLedger::new().with_balance("A", LAMPORTS));
    let poller = poller_with(&ledger);

    poller.start(Some("A"));
    ledger.wait_for_calls("A", 1).await;

    tokio::time::sleep(Duration::from_secs(14)).await;
    assert_eq!(ledger.call_count("A"), 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    ledger.wait_for_calls("A", 2).await;

    tokio::time::sleep(Duration::from_secs(15)).await;
    ledger.wait_for_calls("A", 3).await;
    assert_eq!(ledger.call_count("A"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_fetching_and_can_repeat() {
    let ledger = Arc::new(MockLedger::new().with_balance("A", LAMPORTS));
    let poller = poller_with(&ledger);

    poller.start(Some("A"));
    ledger.wait_for_calls("A", 1).await;

    poller.stop();
    poller.stop();
    poller.stop();

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(ledger.call_count("A"), 1);
    assert_eq!(poller.status(), PollerStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_failure_shows_unknown_until_next_successful_tick() {
    let ledger = Arc::new(MockLedger::new().with_balance("A", 3 * LAMPORTS));
    ledger.fail("A");
    let poller = poller_with(&ledger);

    poller.start(Some("A"));
    let state = wait_for_display(&poller, |s| s.status() == DisplayStatus::Unknown).await;
    assert_eq!(state.value(), None);

    // No immediate retry
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(ledger.call_count("A"), 1);
    assert_eq!(poller.display().status(), DisplayStatus::Unknown);

    ledger.recover("A");
    let state = wait_for_display(&poller, |s| s.is_ready()).await;
    assert_eq!(state.formatted_value(4).as_deref(), Some("3.0000"));
    assert_eq!(ledger.call_count("A"), 2);
}

#[tokio::test]
async fn test_follow_tracks_session_changes() {
    let ledger = Arc::new(
        MockLedger::new()
            .with_balance("A", 5 * LAMPORTS)
            .with_balance("B", 2_500_000_000),
    );
    let poller = poller_with(&ledger);
    let session = SessionChannel::new();

    let follower = poller.follow(&session);
    let state = wait_for_display(&poller, |s| s.status() == DisplayStatus::Unknown).await;
    assert_eq!(state.account_id(), None);
    assert!(ledger.calls().is_empty());

    session.connect("A");
    let state = wait_for_display(&poller, |s| s.is_ready() && s.account_id() == Some("A")).await;
    assert_eq!(state.value(), Some(5.0));

    session.connect("B");
    let state = wait_for_display(&poller, |s| s.is_ready() && s.account_id() == Some("B")).await;
    assert_eq!(state.value(), Some(2.5));
    assert_eq!(poller.status(), PollerStatus::Polling("B".to_string()));

    session.disconnect();
    let state = wait_for_display(&poller, |s| s.status() == DisplayStatus::Unknown).await;
    assert_eq!(state.account_id(), None);
    assert_eq!(poller.status(), PollerStatus::Idle);
    assert_eq!(session.current().active_account(), None);

    drop(session);
    follower.await.unwrap();
    assert_eq!(poller.status(), PollerStatus::Idle);
}

#[tokio::test]
async fn test_follow_ignores_redundant_notifications() {
    let ledger = Arc::new(MockLedger::new().with_balance("A", LAMPORTS));
    let poller = poller_with(&ledger);
    let session = SessionChannel::new();
    session.connect("A");

    let _follower = poller.follow(&session);
    wait_for_display(&poller, |s| s.is_ready()).await;

    // Reconnecting the same account must not restart the cycle
    session.connect("A");
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(ledger.call_count("A"), 1);
    assert!(poller.display().is_ready());
}
