//! Transaction invariants.
//!
//! - `amount > 0`
//! - `0 <= split_ratio <= 100`
//! - `0 <= split_amount <= amount`, and only for custom splits

use rust_decimal::Decimal;

use super::error::TransactionError;
use super::types::{SplitType, Transaction, TransactionInput};

/// Validates amount and split fields.
pub fn validate_split(
    amount: Decimal,
    split_type: SplitType,
    split_ratio: u8,
    split_amount: Option<Decimal>,
) -> Result<(), TransactionError> {
    if amount <= Decimal::ZERO {
        return Err(TransactionError::NonPositiveAmount(amount));
    }
    if split_ratio > 100 {
        return Err(TransactionError::SplitRatioOutOfRange(split_ratio));
    }
    if let Some(split_amount) = split_amount {
        if split_type != SplitType::Custom {
            return Err(TransactionError::SplitAmountRequiresCustom);
        }
        if split_amount < Decimal::ZERO || split_amount > amount {
            return Err(TransactionError::SplitAmountOutOfRange {
                split_amount,
                amount,
            });
        }
    }
    Ok(())
}

impl TransactionInput {
    /// Checks the data-model invariants.
    pub fn validate(&self) -> Result<(), TransactionError> {
        validate_split(
            self.amount,
            self.split_type,
            self.split_ratio,
            self.split_amount,
        )
    }
}

impl Transaction {
    /// Checks the data-model invariants.
    pub fn validate(&self) -> Result<(), TransactionError> {
        validate_split(
            self.amount,
            self.split_type,
            self.split_ratio,
            self.split_amount,
        )
    }
}
