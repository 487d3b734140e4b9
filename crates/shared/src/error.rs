//! Application-wide error types.
//!
//! Each crate keeps its own error enum and converts into [`AppError`] when an
//! error leaves a service call. The category decides the status reported to
//! the caller.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Error categories surfaced to callers.
#[derive(Debug, Error)]
pub enum AppError {
    /// The acting partner may not touch this record.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// A couple, transaction, or settlement does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input failed a field-level check.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Input was well formed but breaks a ledger rule, such as over-settlement.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// The record changed underneath the request.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The record store failed or holds inconsistent data.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The exchange-rate provider could not answer.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP-equivalent status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::BusinessRule(_) => 422,
            Self::ExternalService(_) => 502,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the same call may succeed later without changing its input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService(_) | Self::Storage(_))
    }
}
