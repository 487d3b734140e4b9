//! Per-couple read cache with explicit invalidation.
//!
//! Balance and unsettled computations run over a [`LedgerView`] fetched
//! once from the store. Every mutation made through the session drops the
//! view, so the next read refetches and never observes stale settlements.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use duet_core::couple::Couple;
use duet_core::settlement::{
    Balance, Selection, Settlement, SettlementError, SettlementItem, UnsettledTransaction,
    calculate_balance, unsettled,
};
use duet_core::transaction::{Transaction, TransactionInput, TransactionPatch};
use duet_shared::types::{CoupleId, Currency, MonthKey, SettlementId, TransactionId, UserId};
use duet_shared::{AppConfig, AppResult};

use crate::rates::{ExchangeRateService, RateProvider};
use crate::repositories::LedgerRepository;
use crate::services::{SettlementService, TransactionService};

/// Everything balance computations need, fetched at one point in time.
#[derive(Debug, Clone)]
pub struct LedgerView {
    /// The couple.
    pub couple: Couple,
    /// All transactions, newest first.
    pub transactions: Vec<Transaction>,
    /// All settlements, newest first.
    pub settlements: Vec<Settlement>,
    /// Items of confirmed settlements.
    pub confirmed_items: Vec<SettlementItem>,
    /// When the view was fetched.
    pub loaded_at: DateTime<Utc>,
}

/// A couple's ledger as seen by one client.
pub struct CoupleSession<R: LedgerRepository, P: RateProvider> {
    couple_id: CoupleId,
    repo: Arc<R>,
    transactions: TransactionService<R, P>,
    settlements: SettlementService<R>,
    view: RwLock<Option<Arc<LedgerView>>>,
}

impl<R: LedgerRepository, P: RateProvider> CoupleSession<R, P> {
    /// Opens a session; nothing is fetched until the first read.
    #[must_use]
    pub fn new(
        couple_id: CoupleId,
        repo: Arc<R>,
        rates: Arc<ExchangeRateService<P>>,
        config: &AppConfig,
    ) -> Self {
        Self {
            couple_id,
            transactions: TransactionService::new(
                Arc::clone(&repo),
                rates,
                config.settlement.conversion_failure,
            ),
            settlements: SettlementService::new(Arc::clone(&repo), config.settlement.clone()),
            repo,
            view: RwLock::new(None),
        }
    }

    /// The couple this session is bound to.
    #[must_use]
    pub fn couple_id(&self) -> CoupleId {
        self.couple_id
    }

    /// Returns the cached view, fetching it if it was invalidated.
    pub async fn view(&self) -> AppResult<Arc<LedgerView>> {
        if let Some(view) = self.view.read().await.as_ref() {
            return Ok(Arc::clone(view));
        }
        self.refresh().await
    }

    /// Refetches the view from the store.
    pub async fn refresh(&self) -> AppResult<Arc<LedgerView>> {
        let mut slot = self.view.write().await;

        let couple = self.repo.fetch_couple(self.couple_id).await?;
        let transactions = self.repo.fetch_transactions(self.couple_id, None).await?;
        let settlements = self.repo.fetch_settlements(self.couple_id).await?;
        let confirmed_items = self.repo.fetch_confirmed_items(self.couple_id).await?;

        let view = Arc::new(LedgerView {
            couple,
            transactions,
            settlements,
            confirmed_items,
            loaded_at: Utc::now(),
        });
        tracing::debug!(
            couple_id = %self.couple_id,
            transactions = view.transactions.len(),
            settlements = view.settlements.len(),
            "Ledger view refreshed"
        );
        *slot = Some(Arc::clone(&view));
        Ok(view)
    }

    /// Drops the cached view.
    pub async fn invalidate(&self) {
        if self.view.write().await.take().is_some() {
            tracing::debug!(couple_id = %self.couple_id, "Ledger view invalidated");
        }
    }

    /// Returns true if the next read will hit the store.
    pub async fn is_stale(&self) -> bool {
        self.view.read().await.is_none()
    }

    /// Balance from `user`'s point of view.
    pub async fn balance(&self, user: UserId, display: Currency) -> AppResult<Balance> {
        let view = self.view().await?;
        let partner = view
            .couple
            .partner_of(user)
            .ok_or(SettlementError::NotParticipant { user_id: user })?;

        let balance = calculate_balance(
            &view.transactions,
            &view.confirmed_items,
            user,
            partner,
            display,
        );
        let display_currency = display;
        for transaction_id in &balance.excluded {
            tracing::debug!(%transaction_id, display = %display_currency, "Expense has no conversion path");
        }
        Ok(balance)
    }

    /// Expenses with an outstanding share, newest first.
    pub async fn unsettled(&self, display: Currency) -> AppResult<Vec<UnsettledTransaction>> {
        let view = self.view().await?;
        Ok(unsettled(&view.transactions, &view.confirmed_items, display))
    }

    /// Transactions, newest first, optionally for one month.
    pub async fn transactions(&self, month: Option<MonthKey>) -> AppResult<Vec<Transaction>> {
        let view = self.view().await?;
        Ok(view
            .transactions
            .iter()
            .filter(|tx| month.is_none_or(|m| m.contains(tx.date)))
            .cloned()
            .collect())
    }

    /// Settlements, newest first.
    pub async fn settlements(&self) -> AppResult<Vec<Settlement>> {
        Ok(self.view().await?.settlements.clone())
    }

    /// Settlements waiting for `user` to confirm.
    pub async fn pending_for(&self, user: UserId) -> AppResult<Vec<Settlement>> {
        let view = self.view().await?;
        Ok(view
            .settlements
            .iter()
            .filter(|s| s.is_pending_for(user))
            .cloned()
            .collect())
    }

    /// Materialized items of one settlement.
    pub async fn settlement_items(
        &self,
        settlement_id: SettlementId,
    ) -> AppResult<Vec<SettlementItem>> {
        self.settlements.items(settlement_id).await
    }

    /// Records a transaction.
    pub async fn record_transaction(&self, input: TransactionInput) -> AppResult<Transaction> {
        let tx = self.transactions.record(self.couple_id, input).await?;
        self.invalidate().await;
        Ok(tx)
    }

    /// Edits a transaction.
    pub async fn update_transaction(
        &self,
        transaction_id: TransactionId,
        patch: TransactionPatch,
    ) -> AppResult<Transaction> {
        let tx = self
            .transactions
            .update(self.couple_id, transaction_id, patch)
            .await?;
        self.invalidate().await;
        Ok(tx)
    }

    /// Deletes a transaction.
    pub async fn delete_transaction(&self, transaction_id: TransactionId) -> AppResult<()> {
        self.transactions
            .delete(self.couple_id, transaction_id)
            .await?;
        self.invalidate().await;
        Ok(())
    }

    /// Requests settlement of selected transactions.
    pub async fn request_settlement(
        &self,
        requested_by: UserId,
        display: Currency,
        selections: &[Selection],
        memo: impl Into<String>,
    ) -> AppResult<Settlement> {
        let settlement = self
            .settlements
            .request(self.couple_id, requested_by, display, selections, memo)
            .await?;
        self.invalidate().await;
        Ok(settlement)
    }

    /// Requests settlement of one month.
    pub async fn request_monthly_settlement(
        &self,
        requested_by: UserId,
        display: Currency,
        month: MonthKey,
        memo: impl Into<String>,
    ) -> AppResult<Settlement> {
        let settlement = self
            .settlements
            .request_monthly(self.couple_id, requested_by, display, month, memo)
            .await?;
        self.invalidate().await;
        Ok(settlement)
    }

    /// Confirms a settlement.
    pub async fn confirm_settlement(
        &self,
        settlement_id: SettlementId,
        actor: UserId,
    ) -> AppResult<Settlement> {
        let settlement = self.settlements.confirm(settlement_id, actor).await?;
        self.invalidate().await;
        Ok(settlement)
    }

    /// Cancels or reverses a settlement.
    pub async fn cancel_settlement(
        &self,
        settlement_id: SettlementId,
        actor: UserId,
    ) -> AppResult<Settlement> {
        let settlement = self.settlements.cancel(settlement_id, actor).await?;
        self.invalidate().await;
        Ok(settlement)
    }
}
