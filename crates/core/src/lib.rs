//! Core business logic for Duet.
//!
//! This crate contains pure business logic with ZERO network or storage dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `couple` - The two-partner aggregate and profiles
//! - `transaction` - Income and expense records with split policies
//! - `currency` - Multi-currency valuation and exchange rates
//! - `settlement` - Balances, unsettled shares, and the settlement lifecycle

pub mod couple;
pub mod currency;
pub mod settlement;
pub mod transaction;
