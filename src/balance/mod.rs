pub mod models;
pub mod poller;


pub use models::{BalanceReading, BalanceUnavailable, DisplayState, DisplayStatus};
pub use poller::{BalancePoller, PollerSettings, PollerStatus};
