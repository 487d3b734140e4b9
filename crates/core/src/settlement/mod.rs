//! Balance reconciliation and settlement between the two partners.
//!
//! # Modules
//!
//! - `share` - Non-payer share per split policy
//! - `aggregate` - Confirmed settled amounts per transaction
//! - `balance` - Net balance between the partners
//! - `unsettled` - Expenses with an outstanding share
//! - `request` - Building pending settlement requests
//! - `capacity` - Confirm-time over-settlement guard
//! - `service` - Settlement state machine
//! - `types` - Settlement, item, and action types
//! - `error` - Settlement errors

pub mod aggregate;
pub mod balance;
pub mod capacity;
pub mod error;
pub mod request;
pub mod service;
pub mod share;
pub mod types;
pub mod unsettled;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod service_props;

pub use aggregate::{Outstanding, SettledMap, outstanding, remaining_original, settled_in_display};
pub use balance::{Balance, BalanceDirection, calculate_balance};
pub use capacity::verify_capacity;
pub use error::SettlementError;
pub use request::{Selection, build_monthly_request, build_request};
pub use service::SettlementWorkflow;
pub use share::other_share;
pub use types::{
    Settlement, SettlementAction, SettlementItem, SettlementRequest, SettlementStatus,
    SettlementType, StagedItem,
};
pub use unsettled::{UnsettledTransaction, unsettled};
