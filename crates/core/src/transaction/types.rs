//! Transaction domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use duet_shared::types::{CategoryId, CoupleId, Currency, TransactionId, UserId};

/// Whether money came in or went out.
///
/// Only expenses take part in balance and settlement calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

/// How an expense is shared between the payer and the other partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitType {
    /// Each partner owes half.
    #[serde(rename = "50_50")]
    FiftyFifty,
    /// The payer's share is given by `split_amount` or `split_ratio`.
    #[serde(rename = "custom")]
    Custom,
    /// The payer bore the whole cost; nothing is owed.
    #[serde(rename = "paid_for_self")]
    PaidForSelf,
    /// The payer covered the other partner entirely.
    #[serde(rename = "paid_for_partner")]
    PaidForPartner,
}

impl SplitType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FiftyFifty => "50_50",
            Self::Custom => "custom",
            Self::PaidForSelf => "paid_for_self",
            Self::PaidForPartner => "paid_for_partner",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary valuation captured when the transaction was recorded.
///
/// `converted_amount = amount * exchange_rate`, in the partner's home currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConversion {
    /// Amount in `converted_currency`.
    pub converted_amount: Decimal,
    /// The partner's home currency at recording time.
    pub converted_currency: Currency,
    /// Rate mapping `currency -> converted_currency`.
    pub exchange_rate: Decimal,
}

/// An income or expense event recorded by one partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning couple.
    pub couple_id: CoupleId,
    /// The partner who paid.
    pub paid_by: UserId,
    /// Date the money moved.
    pub date: NaiveDate,
    /// Income or expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Optional category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Original recorded amount.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: Currency,
    /// Amount in `converted_currency`, when a conversion was recorded.
    #[serde(default)]
    pub converted_amount: Option<Decimal>,
    /// Currency of `converted_amount`.
    #[serde(default)]
    pub converted_currency: Option<Currency>,
    /// Rate used for the conversion.
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
    /// Split policy.
    pub split_type: SplitType,
    /// Payer's share in percent, for custom splits without `split_amount`.
    #[serde(default)]
    pub split_ratio: u8,
    /// Payer's own share as an absolute amount in `currency`.
    #[serde(default)]
    pub split_amount: Option<Decimal>,
    /// Free-form note.
    #[serde(default)]
    pub memo: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a new transaction from validated input.
    #[must_use]
    pub fn from_input(
        couple_id: CoupleId,
        input: TransactionInput,
        conversion: Option<StoredConversion>,
    ) -> Self {
        let now = Utc::now();
        let mut tx = Self {
            id: TransactionId::new(),
            couple_id,
            paid_by: input.paid_by,
            date: input.date,
            transaction_type: input.transaction_type,
            category_id: input.category_id,
            amount: input.amount,
            currency: input.currency,
            converted_amount: None,
            converted_currency: None,
            exchange_rate: None,
            split_type: input.split_type,
            split_ratio: input.split_ratio,
            split_amount: input.split_amount,
            memo: input.memo,
            created_at: now,
            updated_at: now,
        };
        tx.set_conversion(conversion);
        tx
    }

    /// Returns true for expense transactions.
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Returns the stored conversion, if all three fields are present.
    #[must_use]
    pub fn conversion(&self) -> Option<StoredConversion> {
        Some(StoredConversion {
            converted_amount: self.converted_amount?,
            converted_currency: self.converted_currency?,
            exchange_rate: self.exchange_rate?,
        })
    }

    /// Replaces the stored conversion fields.
    pub fn set_conversion(&mut self, conversion: Option<StoredConversion>) {
        self.converted_amount = conversion.map(|c| c.converted_amount);
        self.converted_currency = conversion.map(|c| c.converted_currency);
        self.exchange_rate = conversion.map(|c| c.exchange_rate);
    }

    /// Applies a partial edit.
    ///
    /// Returns true when the stored conversion is no longer valid
    /// (amount, currency or date changed) and must be recomputed.
    pub fn apply_patch(&mut self, patch: TransactionPatch) -> bool {
        let mut reconvert = false;
        if let Some(date) = patch.date {
            reconvert |= date != self.date;
            self.date = date;
        }
        if let Some(amount) = patch.amount {
            reconvert |= amount != self.amount;
            self.amount = amount;
        }
        if let Some(currency) = patch.currency {
            reconvert |= currency != self.currency;
            self.currency = currency;
        }
        if let Some(transaction_type) = patch.transaction_type {
            self.transaction_type = transaction_type;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(split_type) = patch.split_type {
            self.split_type = split_type;
        }
        if let Some(split_ratio) = patch.split_ratio {
            self.split_ratio = split_ratio;
        }
        if let Some(split_amount) = patch.split_amount {
            self.split_amount = split_amount;
        }
        if let Some(memo) = patch.memo {
            self.memo = memo;
        }
        self.updated_at = Utc::now();
        reconvert
    }
}

/// Input for recording a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Date the money moved.
    pub date: NaiveDate,
    /// Income or expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Optional category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: Currency,
    /// Split policy.
    pub split_type: SplitType,
    /// Payer's share in percent.
    #[serde(default = "default_split_ratio")]
    pub split_ratio: u8,
    /// Payer's own share as an absolute amount.
    #[serde(default)]
    pub split_amount: Option<Decimal>,
    /// Free-form note.
    #[serde(default)]
    pub memo: String,
    /// The partner who paid.
    pub paid_by: UserId,
}

fn default_split_ratio() -> u8 {
    50
}

/// Partial edit of an existing transaction. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// New date.
    pub date: Option<NaiveDate>,
    /// New type.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// New category (`Some(None)` clears it).
    pub category_id: Option<Option<CategoryId>>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New currency.
    pub currency: Option<Currency>,
    /// New split policy.
    pub split_type: Option<SplitType>,
    /// New split ratio.
    pub split_ratio: Option<u8>,
    /// New split amount (`Some(None)` clears it).
    pub split_amount: Option<Option<Decimal>>,
    /// New memo.
    pub memo: Option<String>,
}
