pub mod balance_metrics;
pub mod server;

pub use balance_metrics::BalanceMetrics;
pub use server::start_metrics_server;
