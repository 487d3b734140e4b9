//! Record store, exchange rates, and session caching for Duet.
//!
//! This crate provides:
//! - The [`LedgerRepository`] abstraction and an in-memory implementation
//! - Exchange-rate lookup backed by a Moka cache and a live provider
//! - Services that persist transactions and drive the settlement lifecycle
//! - [`CoupleSession`], a read cache invalidated by every mutation

pub mod error;
pub mod rates;
pub mod repositories;
pub mod services;
pub mod session;

pub use error::{RateError, StoreError};
pub use rates::{ExchangeRateService, FrankfurterProvider, RateCache, RateProvider};
pub use repositories::memory::LedgerSnapshot;
pub use repositories::{InMemoryLedger, LedgerRepository};
pub use services::{SettlementService, TransactionService};
pub use session::{CoupleSession, LedgerView};
