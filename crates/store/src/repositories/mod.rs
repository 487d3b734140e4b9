//! Record store abstraction.
//!
//! Services are generic over [`LedgerRepository`] so the same code runs
//! against the in-memory store and any persistent backend.

pub mod memory;

use std::future::Future;

use duet_core::couple::{Couple, Profile};
use duet_core::settlement::{Settlement, SettlementItem};
use duet_core::transaction::Transaction;
use duet_shared::types::{CoupleId, MonthKey, SettlementId, TransactionId, UserId};

use crate::error::StoreError;

pub use memory::InMemoryLedger;

/// Persistence for couples, transactions, and settlements.
pub trait LedgerRepository: Send + Sync {
    /// Fetch a couple by ID.
    fn fetch_couple(
        &self,
        couple_id: CoupleId,
    ) -> impl Future<Output = Result<Couple, StoreError>> + Send;

    /// Fetch a user's profile.
    fn fetch_profile(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Profile, StoreError>> + Send;

    /// Fetch a couple's transactions, newest first, optionally for one month.
    fn fetch_transactions(
        &self,
        couple_id: CoupleId,
        month: Option<MonthKey>,
    ) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;

    /// Fetch one transaction.
    fn fetch_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> impl Future<Output = Result<Transaction, StoreError>> + Send;

    /// Insert a new transaction.
    fn insert_transaction(
        &self,
        transaction: &Transaction,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace an existing transaction.
    fn update_transaction(
        &self,
        transaction: &Transaction,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete a transaction. Returns false if it did not exist.
    fn delete_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Fetch a couple's settlements, newest first.
    fn fetch_settlements(
        &self,
        couple_id: CoupleId,
    ) -> impl Future<Output = Result<Vec<Settlement>, StoreError>> + Send;

    /// Fetch one settlement.
    fn fetch_settlement(
        &self,
        settlement_id: SettlementId,
    ) -> impl Future<Output = Result<Settlement, StoreError>> + Send;

    /// Insert a new settlement with its staged items.
    fn insert_settlement(
        &self,
        settlement: &Settlement,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace an existing settlement (status and audit fields).
    fn update_settlement(
        &self,
        settlement: &Settlement,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Persist materialized settlement items.
    fn insert_items(
        &self,
        items: &[SettlementItem],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetch the items of one settlement, whatever its status.
    fn fetch_items(
        &self,
        settlement_id: SettlementId,
    ) -> impl Future<Output = Result<Vec<SettlementItem>, StoreError>> + Send;

    /// Fetch the items of the couple's confirmed settlements only.
    fn fetch_confirmed_items(
        &self,
        couple_id: CoupleId,
    ) -> impl Future<Output = Result<Vec<SettlementItem>, StoreError>> + Send;
}
