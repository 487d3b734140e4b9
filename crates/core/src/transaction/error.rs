//! Transaction validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

use duet_shared::AppError;
use duet_shared::types::{TransactionId, UserId};

/// Errors raised when a transaction violates the data-model invariants.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Amount must be strictly positive.
    #[error("Transaction amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Split ratio must be a percentage.
    #[error("Split ratio must be between 0 and 100, got {0}")]
    SplitRatioOutOfRange(u8),

    /// Explicit split amount must lie within `0..=amount`.
    #[error("Split amount {split_amount} must be between 0 and the transaction amount {amount}")]
    SplitAmountOutOfRange {
        /// The offending split amount.
        split_amount: Decimal,
        /// The transaction amount.
        amount: Decimal,
    },

    /// Explicit split amounts only apply to custom splits.
    #[error("Split amount is only allowed for custom splits")]
    SplitAmountRequiresCustom,

    /// The payer is not one of the couple's partners.
    #[error("User {0} is not a member of this couple")]
    PayerNotInCouple(UserId),

    /// Transaction not found.
    #[error("Transaction {0} not found")]
    NotFound(TransactionId),
}

impl TransactionError {
    /// Returns the HTTP-equivalent status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount(_)
            | Self::SplitRatioOutOfRange(_)
            | Self::SplitAmountOutOfRange { .. }
            | Self::SplitAmountRequiresCustom => 400,
            Self::PayerNotInCouple(_) => 403,
            Self::NotFound(_) => 404,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::SplitRatioOutOfRange(_) => "SPLIT_RATIO_OUT_OF_RANGE",
            Self::SplitAmountOutOfRange { .. } => "SPLIT_AMOUNT_OUT_OF_RANGE",
            Self::SplitAmountRequiresCustom => "SPLIT_AMOUNT_REQUIRES_CUSTOM",
            Self::PayerNotInCouple(_) => "PAYER_NOT_IN_COUPLE",
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
        }
    }
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        let message = err.to_string();
        match err {
            TransactionError::PayerNotInCouple(_) => Self::Forbidden(message),
            TransactionError::NotFound(_) => Self::NotFound(message),
            _ => Self::Validation(message),
        }
    }
}
