//! Recording, editing, and deleting transactions.
//!
//! A transaction recorded in a currency other than the partner's home
//! currency is valued in that currency at the transaction date, and the
//! valuation is stored alongside the original amount.

use std::sync::Arc;

use duet_core::couple::Couple;
use duet_core::currency::convert_amount;
use duet_core::transaction::{
    StoredConversion, Transaction, TransactionError, TransactionInput, TransactionPatch,
};
use duet_shared::config::ConversionFailurePolicy;
use duet_shared::types::{CoupleId, TransactionId};
use duet_shared::{AppError, AppResult};

use crate::rates::{ExchangeRateService, RateProvider};
use crate::repositories::LedgerRepository;

/// Transaction service.
pub struct TransactionService<R: LedgerRepository, P: RateProvider> {
    repo: Arc<R>,
    rates: Arc<ExchangeRateService<P>>,
    conversion_failure: ConversionFailurePolicy,
}

impl<R: LedgerRepository, P: RateProvider> TransactionService<R, P> {
    /// Creates a new transaction service.
    #[must_use]
    pub fn new(
        repo: Arc<R>,
        rates: Arc<ExchangeRateService<P>>,
        conversion_failure: ConversionFailurePolicy,
    ) -> Self {
        Self {
            repo,
            rates,
            conversion_failure,
        }
    }

    /// Validates and records a new transaction.
    pub async fn record(
        &self,
        couple_id: CoupleId,
        input: TransactionInput,
    ) -> AppResult<Transaction> {
        input.validate()?;
        let couple = self.repo.fetch_couple(couple_id).await?;
        if !couple.contains(input.paid_by) {
            return Err(TransactionError::PayerNotInCouple(input.paid_by).into());
        }

        let mut tx = Transaction::from_input(couple_id, input, None);
        let conversion = self.conversion_for(&couple, &tx).await?;
        tx.set_conversion(conversion);

        self.repo.insert_transaction(&tx).await?;
        tracing::info!(
            transaction_id = %tx.id,
            couple_id = %couple_id,
            amount = %tx.amount,
            currency = %tx.currency,
            converted = tx.converted_amount.is_some(),
            "Transaction recorded"
        );
        Ok(tx)
    }

    /// Applies a partial edit, recomputing the stored conversion when the
    /// amount, currency, or date changed.
    pub async fn update(
        &self,
        couple_id: CoupleId,
        transaction_id: TransactionId,
        patch: TransactionPatch,
    ) -> AppResult<Transaction> {
        let mut tx = self.fetch_owned(couple_id, transaction_id).await?;

        let reconvert = tx.apply_patch(patch);
        tx.validate()?;
        if reconvert {
            let couple = self.repo.fetch_couple(couple_id).await?;
            let conversion = self.conversion_for(&couple, &tx).await?;
            tx.set_conversion(conversion);
        }

        self.repo.update_transaction(&tx).await?;
        tracing::info!(transaction_id = %tx.id, reconverted = reconvert, "Transaction updated");
        Ok(tx)
    }

    /// Deletes a transaction.
    pub async fn delete(&self, couple_id: CoupleId, transaction_id: TransactionId) -> AppResult<()> {
        self.fetch_owned(couple_id, transaction_id).await?;
        if !self.repo.delete_transaction(transaction_id).await? {
            return Err(TransactionError::NotFound(transaction_id).into());
        }
        tracing::info!(transaction_id = %transaction_id, "Transaction deleted");
        Ok(())
    }

    async fn fetch_owned(
        &self,
        couple_id: CoupleId,
        transaction_id: TransactionId,
    ) -> AppResult<Transaction> {
        let tx = self.repo.fetch_transaction(transaction_id).await?;
        if tx.couple_id != couple_id {
            return Err(TransactionError::NotFound(transaction_id).into());
        }
        Ok(tx)
    }

    /// Values `tx` in the home currency of the payer's partner.
    async fn conversion_for(
        &self,
        couple: &Couple,
        tx: &Transaction,
    ) -> AppResult<Option<StoredConversion>> {
        let partner = couple
            .partner_of(tx.paid_by)
            .ok_or(TransactionError::PayerNotInCouple(tx.paid_by))?;
        let target = self.repo.fetch_profile(partner).await?.home_currency;
        if target == tx.currency {
            return Ok(None);
        }

        match self.rates.get_rate(tx.currency, target, tx.date).await {
            Ok(rate) => Ok(Some(StoredConversion {
                converted_amount: convert_amount(tx.amount, rate),
                converted_currency: target,
                exchange_rate: rate,
            })),
            Err(err) => match self.conversion_failure {
                ConversionFailurePolicy::Reject => Err(AppError::from(err)),
                ConversionFailurePolicy::StoreUnconverted => {
                    tracing::warn!(
                        transaction_id = %tx.id,
                        error = %err,
                        "Storing transaction without conversion"
                    );
                    Ok(None)
                }
            },
        }
    }
}
