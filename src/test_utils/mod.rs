//! Test utilities for the NovaPay crate
//!
//! Shared by unit tests and the integration tests under `tests/`. Only
//! compiled for tests or with the `test-utils` feature.

pub mod mocks;

pub use mocks::*;

use crate::balance::{BalancePoller, DisplayState};
use std::time::Duration;

/// Wait until the poller's display satisfies `predicate` and return it
pub async fn wait_for_display<F>(poller: &BalancePoller, predicate: F) -> DisplayState
where
    F: Fn(&DisplayState) -> bool,
{
    let mut rx = poller.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(60), rx.wait_for(|s| predicate(s)))
        .await
        .expect("timed out waiting for display state")
        .expect("display channel closed");
    state.clone()
}
