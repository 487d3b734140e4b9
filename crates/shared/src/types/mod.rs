//! Common types used across the application.

pub mod currency;
pub mod id;
pub mod month;

pub use currency::{Currency, UnknownCurrency};
pub use id::*;
pub use month::{MonthKey, MonthKeyError};
