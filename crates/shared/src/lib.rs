//! Shared types, errors, and configuration for Duet.
//!
//! This crate provides common types used across all other crates:
//! - The closed currency set
//! - Typed IDs for type-safe entity references
//! - Month keys for period filtering
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ConversionFailurePolicy};
pub use error::{AppError, AppResult};
