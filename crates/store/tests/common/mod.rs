//! Fixtures shared by the store integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use duet_core::couple::{Couple, Profile};
use duet_core::currency::RateKey;
use duet_core::transaction::{SplitType, TransactionInput, TransactionType};
use duet_shared::types::{Currency, UserId};
use duet_store::{ExchangeRateService, InMemoryLedger, RateCache, RateError, RateProvider};

/// Rate provider answering from a fixed table.
#[derive(Default)]
pub struct StubProvider {
    rates: Mutex<HashMap<(Currency, Currency), Decimal>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn with_rate(self, base: Currency, target: Currency, rate: Decimal) -> Self {
        self.rates.lock().unwrap().insert((base, target), rate);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RateProvider for StubProvider {
    async fn fetch_rate(&self, key: RateKey) -> Result<Decimal, RateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RateError::Provider("connection refused".to_string()));
        }
        self.rates
            .lock()
            .unwrap()
            .get(&(key.base, key.target))
            .copied()
            .ok_or(RateError::MissingRate {
                base: key.base,
                target: key.target,
                date: key.date,
            })
    }
}

pub fn rate_service(provider: StubProvider) -> (Arc<StubProvider>, Arc<ExchangeRateService<StubProvider>>) {
    let provider = Arc::new(provider);
    let service = Arc::new(ExchangeRateService::new(
        Arc::clone(&provider),
        RateCache::with_config(100, 60),
    ));
    (provider, service)
}

/// A couple where the first partner lives in KRW and the second in USD.
pub struct Household {
    pub store: Arc<InMemoryLedger>,
    pub couple: Couple,
    pub minji: UserId,
    pub sam: UserId,
}

pub async fn household() -> Household {
    let minji = UserId::new();
    let sam = UserId::new();
    let couple = Couple::new(minji, sam);
    let store = Arc::new(InMemoryLedger::new());

    store.insert_couple(couple.clone()).await;
    store
        .upsert_profile(Profile {
            id: minji,
            display_name: "Minji".to_string(),
            home_currency: Currency::Krw,
        })
        .await;
    store
        .upsert_profile(Profile {
            id: sam,
            display_name: "Sam".to_string(),
            home_currency: Currency::Usd,
        })
        .await;

    Household {
        store,
        couple,
        minji,
        sam,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn expense(paid_by: UserId, on: NaiveDate, amount: Decimal, currency: Currency) -> TransactionInput {
    TransactionInput {
        date: on,
        transaction_type: TransactionType::Expense,
        category_id: None,
        amount,
        currency,
        split_type: SplitType::FiftyFifty,
        split_ratio: 50,
        split_amount: None,
        memo: String::new(),
        paid_by,
    }
}
