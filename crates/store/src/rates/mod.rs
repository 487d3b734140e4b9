//! Exchange-rate lookup.
//!
//! - `provider` - Live rate source
//! - `cache` - `(base, target, date)` rate cache
//! - `service` - Cache-first lookup with provider fallback

pub mod cache;
pub mod provider;
pub mod service;

pub use cache::RateCache;
pub use provider::{FrankfurterProvider, RateProvider};
pub use service::ExchangeRateService;
