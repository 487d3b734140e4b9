//! Settlement requests, confirmations, and reversals.

use std::sync::Arc;

use tokio::sync::Mutex;

use duet_core::settlement::{
    Selection, Settlement, SettlementAction, SettlementError, SettlementItem, SettlementRequest,
    SettlementWorkflow, UnsettledTransaction, build_monthly_request, build_request, unsettled,
    verify_capacity,
};
use duet_shared::config::SettlementConfig;
use duet_shared::types::{CoupleId, Currency, MonthKey, SettlementId, UserId};
use duet_shared::{AppError, AppResult};

use crate::repositories::LedgerRepository;

/// Settlement service.
///
/// Confirmations are serialized so that the capacity check and the
/// materialization of items cannot interleave with another confirmation.
pub struct SettlementService<R: LedgerRepository> {
    repo: Arc<R>,
    config: SettlementConfig,
    confirm_lock: Mutex<()>,
}

impl<R: LedgerRepository> SettlementService<R> {
    /// Creates a new settlement service.
    #[must_use]
    pub fn new(repo: Arc<R>, config: SettlementConfig) -> Self {
        Self {
            repo,
            config,
            confirm_lock: Mutex::new(()),
        }
    }

    /// Requests settlement of selected transactions.
    pub async fn request(
        &self,
        couple_id: CoupleId,
        requested_by: UserId,
        display: Currency,
        selections: &[Selection],
        memo: impl Into<String>,
    ) -> AppResult<Settlement> {
        let candidates = self.candidates(couple_id, display).await?;
        let request = build_request(&candidates, selections, display, memo)?;
        self.open(couple_id, requested_by, request).await
    }

    /// Requests settlement of everything unsettled in `month`.
    pub async fn request_monthly(
        &self,
        couple_id: CoupleId,
        requested_by: UserId,
        display: Currency,
        month: MonthKey,
        memo: impl Into<String>,
    ) -> AppResult<Settlement> {
        let candidates = self.candidates(couple_id, display).await?;
        let request = build_monthly_request(&candidates, month, display, memo)?;
        self.open(couple_id, requested_by, request).await
    }

    /// Confirms a pending settlement on behalf of its counterpart.
    pub async fn confirm(
        &self,
        settlement_id: SettlementId,
        actor: UserId,
    ) -> AppResult<Settlement> {
        let _guard = self.confirm_lock.lock().await;

        let mut settlement = self.repo.fetch_settlement(settlement_id).await?;
        let action = SettlementWorkflow::confirm(&settlement, actor)?;

        if self.config.verify_on_confirm {
            let transactions = self
                .repo
                .fetch_transactions(settlement.couple_id, None)
                .await?;
            let confirmed = self.repo.fetch_confirmed_items(settlement.couple_id).await?;
            if let Err(err) = verify_capacity(&transactions, &confirmed, &settlement.staged_items) {
                tracing::warn!(
                    settlement_id = %settlement.id,
                    error = %err,
                    "Settlement no longer fits the outstanding shares"
                );
                return Err(err.into());
            }
        }

        settlement.apply(&action);
        // Items count toward balances only once the status update lands.
        if let SettlementAction::Confirm { items, .. } = &action {
            self.repo.insert_items(items).await?;
        }
        self.repo.update_settlement(&settlement).await?;

        tracing::info!(
            settlement_id = %settlement.id,
            confirmed_by = %actor,
            total = %settlement.total_amount,
            currency = %settlement.currency,
            "Settlement confirmed"
        );
        Ok(settlement)
    }

    /// Cancels a pending settlement, or reverses a confirmed one.
    pub async fn cancel(
        &self,
        settlement_id: SettlementId,
        actor: UserId,
    ) -> AppResult<Settlement> {
        let mut settlement = self.repo.fetch_settlement(settlement_id).await?;
        let action = SettlementWorkflow::cancel(&settlement, actor)?;

        settlement.apply(&action);
        self.repo.update_settlement(&settlement).await?;

        tracing::info!(
            settlement_id = %settlement.id,
            cancelled_by = %actor,
            reversal = action.is_reversal(),
            "Settlement cancelled"
        );
        Ok(settlement)
    }

    /// All settlements of a couple, newest first.
    pub async fn history(&self, couple_id: CoupleId) -> AppResult<Vec<Settlement>> {
        Ok(self.repo.fetch_settlements(couple_id).await?)
    }

    /// Settlements waiting for `user` to confirm them.
    pub async fn pending_for(
        &self,
        couple_id: CoupleId,
        user: UserId,
    ) -> AppResult<Vec<Settlement>> {
        let settlements = self.repo.fetch_settlements(couple_id).await?;
        Ok(settlements
            .into_iter()
            .filter(|s| s.is_pending_for(user))
            .collect())
    }

    /// Materialized items of a settlement.
    pub async fn items(&self, settlement_id: SettlementId) -> AppResult<Vec<SettlementItem>> {
        self.repo
            .fetch_settlement(settlement_id)
            .await
            .map_err(|_| AppError::from(SettlementError::NotFound(settlement_id)))?;
        Ok(self.repo.fetch_items(settlement_id).await?)
    }

    async fn candidates(
        &self,
        couple_id: CoupleId,
        display: Currency,
    ) -> AppResult<Vec<UnsettledTransaction>> {
        let transactions = self.repo.fetch_transactions(couple_id, None).await?;
        let confirmed = self.repo.fetch_confirmed_items(couple_id).await?;
        Ok(unsettled(&transactions, &confirmed, display))
    }

    async fn open(
        &self,
        couple_id: CoupleId,
        requested_by: UserId,
        request: SettlementRequest,
    ) -> AppResult<Settlement> {
        let couple = self.repo.fetch_couple(couple_id).await?;
        let settlement = SettlementWorkflow::create(&couple, requested_by, request)?;
        self.repo.insert_settlement(&settlement).await?;

        tracing::info!(
            settlement_id = %settlement.id,
            requested_by = %requested_by,
            requested_to = %settlement.requested_to,
            items = settlement.staged_items.len(),
            total = %settlement.total_amount,
            currency = %settlement.currency,
            "Settlement requested"
        );
        Ok(settlement)
    }
}
