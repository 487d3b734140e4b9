//! Income and expense transactions recorded by either partner.
//!
//! # Modules
//!
//! - `types` - Transaction entity, split policy, and input/patch types
//! - `validation` - Data-model invariants (amount, ratio, split amount)
//! - `error` - Transaction validation errors

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::TransactionError;
pub use types::{
    SplitType, StoredConversion, Transaction, TransactionInput, TransactionPatch, TransactionType,
};
pub use validation::validate_split;
