//! Async services over the record store.

pub mod settlement;
pub mod transaction;

pub use settlement::SettlementService;
pub use transaction::TransactionService;
