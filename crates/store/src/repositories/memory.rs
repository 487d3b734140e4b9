//! In-memory record store.
//!
//! Backs tests and the command-line tool. All state lives behind one
//! `tokio::sync::RwLock`, so every operation sees a consistent view.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use duet_core::couple::{Couple, Profile};
use duet_core::settlement::{Settlement, SettlementItem, SettlementStatus};
use duet_core::transaction::Transaction;
use duet_shared::types::{CoupleId, MonthKey, SettlementId, TransactionId, UserId};

use super::LedgerRepository;
use crate::error::StoreError;

/// A serializable dump of one couple's ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Couples.
    #[serde(default)]
    pub couples: Vec<Couple>,
    /// Profiles of the partners.
    #[serde(default)]
    pub profiles: Vec<Profile>,
    /// Transactions.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Settlements, including staged items.
    #[serde(default)]
    pub settlements: Vec<Settlement>,
    /// Materialized settlement items.
    #[serde(default)]
    pub items: Vec<SettlementItem>,
}

impl LedgerSnapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Default)]
struct State {
    couples: HashMap<CoupleId, Couple>,
    profiles: HashMap<UserId, Profile>,
    transactions: HashMap<TransactionId, Transaction>,
    settlements: HashMap<SettlementId, Settlement>,
    items: Vec<SettlementItem>,
}

/// In-memory [`LedgerRepository`].
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<State>,
}

impl InMemoryLedger {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated from a snapshot.
    ///
    /// Items must reference settlements present in the snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, StoreError> {
        let mut state = State::default();
        for couple in snapshot.couples {
            state.couples.insert(couple.id, couple);
        }
        for profile in snapshot.profiles {
            state.profiles.insert(profile.id, profile);
        }
        for tx in snapshot.transactions {
            state.transactions.insert(tx.id, tx);
        }
        for settlement in snapshot.settlements {
            state.settlements.insert(settlement.id, settlement);
        }
        if let Some(orphan) = snapshot
            .items
            .iter()
            .find(|item| !state.settlements.contains_key(&item.settlement_id))
        {
            return Err(StoreError::InvalidData(format!(
                "item {} references unknown settlement {}",
                orphan.id, orphan.settlement_id
            )));
        }
        state.items = snapshot.items;

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Adds a couple.
    pub async fn insert_couple(&self, couple: Couple) {
        self.state.write().await.couples.insert(couple.id, couple);
    }

    /// Adds or replaces a profile.
    pub async fn upsert_profile(&self, profile: Profile) {
        self.state.write().await.profiles.insert(profile.id, profile);
    }

    /// Dumps the whole store.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.read().await;
        LedgerSnapshot {
            couples: state.couples.values().cloned().collect(),
            profiles: state.profiles.values().cloned().collect(),
            transactions: state.transactions.values().cloned().collect(),
            settlements: state.settlements.values().cloned().collect(),
            items: state.items.clone(),
        }
    }
}

impl LedgerRepository for InMemoryLedger {
    async fn fetch_couple(&self, couple_id: CoupleId) -> Result<Couple, StoreError> {
        self.state
            .read()
            .await
            .couples
            .get(&couple_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Couple", couple_id))
    }

    async fn fetch_profile(&self, user_id: UserId) -> Result<Profile, StoreError> {
        self.state
            .read()
            .await
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Profile", user_id))
    }

    async fn fetch_transactions(
        &self,
        couple_id: CoupleId,
        month: Option<MonthKey>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let state = self.state.read().await;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|tx| tx.couple_id == couple_id)
            .filter(|tx| month.is_none_or(|m| m.contains(tx.date)))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(transactions)
    }

    async fn fetch_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Transaction, StoreError> {
        self.state
            .read()
            .await
            .transactions
            .get(&transaction_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Transaction", transaction_id))
    }

    async fn insert_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.couples.contains_key(&transaction.couple_id) {
            return Err(StoreError::not_found("Couple", transaction.couple_id));
        }
        if state.transactions.contains_key(&transaction.id) {
            return Err(StoreError::conflict("Transaction", transaction.id));
        }
        state
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn update_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let slot = state
            .transactions
            .get_mut(&transaction.id)
            .ok_or_else(|| StoreError::not_found("Transaction", transaction.id))?;
        *slot = transaction.clone();
        Ok(())
    }

    async fn delete_transaction(&self, transaction_id: TransactionId) -> Result<bool, StoreError> {
        Ok(self
            .state
            .write()
            .await
            .transactions
            .remove(&transaction_id)
            .is_some())
    }

    async fn fetch_settlements(&self, couple_id: CoupleId) -> Result<Vec<Settlement>, StoreError> {
        let state = self.state.read().await;
        let mut settlements: Vec<Settlement> = state
            .settlements
            .values()
            .filter(|s| s.couple_id == couple_id)
            .cloned()
            .collect();
        settlements.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(settlements)
    }

    async fn fetch_settlement(&self, settlement_id: SettlementId) -> Result<Settlement, StoreError> {
        self.state
            .read()
            .await
            .settlements
            .get(&settlement_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Settlement", settlement_id))
    }

    async fn insert_settlement(&self, settlement: &Settlement) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.couples.contains_key(&settlement.couple_id) {
            return Err(StoreError::not_found("Couple", settlement.couple_id));
        }
        if state.settlements.contains_key(&settlement.id) {
            return Err(StoreError::conflict("Settlement", settlement.id));
        }
        state.settlements.insert(settlement.id, settlement.clone());
        Ok(())
    }

    async fn update_settlement(&self, settlement: &Settlement) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let slot = state
            .settlements
            .get_mut(&settlement.id)
            .ok_or_else(|| StoreError::not_found("Settlement", settlement.id))?;
        *slot = settlement.clone();
        Ok(())
    }

    async fn insert_items(&self, items: &[SettlementItem]) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if let Some(orphan) = items
            .iter()
            .find(|item| !state.settlements.contains_key(&item.settlement_id))
        {
            return Err(StoreError::not_found("Settlement", orphan.settlement_id));
        }
        state.items.extend_from_slice(items);
        Ok(())
    }

    async fn fetch_items(
        &self,
        settlement_id: SettlementId,
    ) -> Result<Vec<SettlementItem>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .items
            .iter()
            .filter(|item| item.settlement_id == settlement_id)
            .cloned()
            .collect())
    }

    async fn fetch_confirmed_items(
        &self,
        couple_id: CoupleId,
    ) -> Result<Vec<SettlementItem>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .filter(|item| {
                state.settlements.get(&item.settlement_id).is_some_and(|s| {
                    s.couple_id == couple_id && s.status == SettlementStatus::Confirmed
                })
            })
            .cloned()
            .collect())
    }
}
