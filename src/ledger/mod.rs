pub mod models;
pub mod rpc;


pub use models::{LedgerError, LedgerQuery};
pub use rpc::SolanaRpcLedger;
