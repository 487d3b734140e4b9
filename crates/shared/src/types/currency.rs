//! The closed set of currencies a couple can record and view amounts in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A currency code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

/// ISO 4217 currency codes supported by the system.
///
/// The set is closed: every per-currency lookup is an exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// South Korean Won
    Krw,
    /// Japanese Yen
    Jpy,
    /// US Dollar
    Usd,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Self; 3] = [Self::Krw, Self::Jpy, Self::Usd];

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Krw => "KRW",
            Self::Jpy => "JPY",
            Self::Usd => "USD",
        }
    }

    /// Fractional digits shown for this currency. Won and yen have none.
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        match self {
            Self::Krw | Self::Jpy => 0,
            Self::Usd => 2,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}
