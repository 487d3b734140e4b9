//! Multi-currency valuation of transactions.

pub mod conversion;
pub mod exchange;

#[cfg(test)]
mod props;

pub use conversion::{
    Precision, ResolvedAmount, convert_amount, resolve_amount, round_minor, round_whole, round2,
    to_original_amount,
};
pub use exchange::{ExchangeRate, RateKey};
