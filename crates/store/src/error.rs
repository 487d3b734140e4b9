//! Store and exchange-rate error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use duet_shared::AppError;
use duet_shared::types::Currency;

/// Errors raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Entity ID.
        id: String,
    },

    /// An entity with the same ID already exists.
    #[error("{entity} {id} already exists")]
    Conflict {
        /// Entity kind.
        entity: &'static str,
        /// Entity ID.
        id: String,
    },

    /// Stored data is inconsistent.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Snapshot could not be decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl StoreError {
    /// Shorthand for a not-found error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a conflict error.
    pub fn conflict(entity: &'static str, id: impl ToString) -> Self {
        Self::Conflict {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::NotFound { .. } => Self::NotFound(message),
            StoreError::Conflict { .. } => Self::Conflict(message),
            StoreError::InvalidData(_) | StoreError::Snapshot(_) => Self::Storage(message),
        }
    }
}

/// Errors raised while looking up exchange rates.
#[derive(Debug, Error)]
pub enum RateError {
    /// The provider could not be reached or returned an error status.
    #[error("Rate provider request failed: {0}")]
    Provider(String),

    /// The provider answered without a rate for the requested pair.
    #[error("Rate provider returned no {base}/{target} rate for {date}")]
    MissingRate {
        /// Base currency.
        base: Currency,
        /// Target currency.
        target: Currency,
        /// Requested date.
        date: NaiveDate,
    },

    /// The provider returned a zero or negative rate.
    #[error("Rate provider returned non-positive rate {0}")]
    NonPositiveRate(Decimal),

    /// Neither the provider nor the cache could supply a rate.
    #[error("No {base}/{target} rate available for {date}")]
    Unavailable {
        /// Base currency.
        base: Currency,
        /// Target currency.
        target: Currency,
        /// Requested date.
        date: NaiveDate,
    },
}

impl RateError {
    /// Returns the HTTP-equivalent status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Provider(_) | Self::MissingRate { .. } | Self::NonPositiveRate(_) => 502,
            Self::Unavailable { .. } => 503,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Provider(_) => "RATE_PROVIDER_ERROR",
            Self::MissingRate { .. } => "RATE_MISSING",
            Self::NonPositiveRate(_) => "RATE_NON_POSITIVE",
            Self::Unavailable { .. } => "RATE_UNAVAILABLE",
        }
    }
}

impl From<reqwest::Error> for RateError {
    fn from(err: reqwest::Error) -> Self {
        Self::Provider(err.to_string())
    }
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        Self::ExternalService(err.to_string())
    }
}
