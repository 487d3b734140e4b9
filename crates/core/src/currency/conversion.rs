//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Intermediate conversions keep 2 decimal places (`round2`)
//! - Reported balances are rounded to whole units (`round_whole`)
//! - Settlement totals keep the display currency's minor units (`round_minor`)
//! - Both use half-away-from-zero so rounding is symmetric around zero
//! - Store both original and converted amounts

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use duet_shared::types::Currency;

use crate::transaction::Transaction;

/// Rounds to 2 decimal places, half away from zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a whole unit, half away from zero.
#[must_use]
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the minor units of `currency`, half away from zero.
#[must_use]
pub fn round_minor(value: Decimal, currency: Currency) -> Decimal {
    value.round_dp_with_strategy(
        currency.decimal_places(),
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Converts an amount using the given exchange rate, keeping 2 decimal places.
///
/// This is the valuation stored on a transaction at recording time.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal) -> Decimal {
    round2(amount * rate)
}

/// How trustworthy a converted value is.
///
/// Ordered from most to least exact, so `max` combines two precisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// No conversion was needed.
    Exact,
    /// Taken from the valuation stored when the transaction was recorded.
    Converted,
    /// Derived in the reverse direction of the stored rate; best effort only.
    Approximated,
}

impl Precision {
    /// The weaker of two precisions.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        self.max(other)
    }
}

/// An amount in a requested currency together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAmount {
    /// The amount.
    pub value: Decimal,
    /// How it was obtained.
    pub precision: Precision,
}

impl ResolvedAmount {
    /// An amount that needed no conversion.
    #[must_use]
    pub const fn exact(value: Decimal) -> Self {
        Self {
            value,
            precision: Precision::Exact,
        }
    }

    /// An amount read from a stored conversion.
    #[must_use]
    pub const fn converted(value: Decimal) -> Self {
        Self {
            value,
            precision: Precision::Converted,
        }
    }

    /// A best-effort amount.
    #[must_use]
    pub const fn approximated(value: Decimal) -> Self {
        Self {
            value,
            precision: Precision::Approximated,
        }
    }

    /// Returns true unless the value is an approximation.
    #[must_use]
    pub fn is_reliable(&self) -> bool {
        self.precision != Precision::Approximated
    }
}

/// Values a transaction in `display` currency.
///
/// Rules, in order:
/// 1. Same currency: the original amount, unrounded.
/// 2. Stored conversion into `display`: the stored converted amount.
/// 3. A stored rate and converted currency: `round2(amount / rate)`,
///    the reverse direction of the stored rate (approximated).
/// 4. Otherwise `None`: the transaction cannot be valued and callers skip it.
#[must_use]
pub fn resolve_amount(tx: &Transaction, display: Currency) -> Option<ResolvedAmount> {
    if tx.currency == display {
        return Some(ResolvedAmount::exact(tx.amount));
    }

    if tx.converted_currency == Some(display) {
        if let Some(converted) = tx.converted_amount {
            return Some(ResolvedAmount::converted(converted));
        }
    }

    match (tx.exchange_rate, tx.converted_currency) {
        (Some(rate), Some(_)) if rate > Decimal::ZERO => {
            Some(ResolvedAmount::approximated(round2(tx.amount / rate)))
        }
        _ => None,
    }
}

/// Converts an amount expressed in `display` back into the transaction's
/// original currency.
///
/// Inverse of [`resolve_amount`]: same currency is exact; a stored conversion
/// into `display` is inverted with the ratio `amount / converted_amount`; a
/// stored rate alone inverts rule 3; with nothing to go on the amount is
/// returned unchanged. Every non-identity path is an approximation.
#[must_use]
pub fn to_original_amount(
    tx: &Transaction,
    display_amount: Decimal,
    display: Currency,
) -> ResolvedAmount {
    if tx.currency == display {
        return ResolvedAmount::exact(display_amount);
    }

    if tx.converted_currency == Some(display) {
        if let Some(converted) = tx.converted_amount.filter(|c| *c > Decimal::ZERO) {
            return ResolvedAmount::approximated(round2(display_amount * tx.amount / converted));
        }
    }

    match tx.exchange_rate {
        Some(rate) if rate > Decimal::ZERO && tx.converted_currency.is_some() => {
            ResolvedAmount::approximated(round2(display_amount * rate))
        }
        _ => ResolvedAmount::approximated(display_amount),
    }
}
