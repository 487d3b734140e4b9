//! Duet reconciliation report
//!
//! Loads a JSON snapshot of a couple's ledger and prints the balance,
//! the unsettled expenses, and the settlements awaiting confirmation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duet_core::settlement::{Balance, Settlement, UnsettledTransaction};
use duet_shared::AppConfig;
use duet_shared::config::LoggingConfig;
use duet_shared::types::{Currency, UserId};
use duet_store::{
    CoupleSession, ExchangeRateService, FrankfurterProvider, InMemoryLedger, LedgerRepository,
    LedgerSnapshot, RateCache,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the ledger snapshot (JSON)
    snapshot: PathBuf,

    /// Partner whose point of view is reported (defaults to the first partner)
    user_id: Option<UserId>,

    /// Display currency (defaults to the partner's home currency)
    currency: Option<Currency>,
}

#[derive(Serialize)]
struct Report {
    user_id: UserId,
    currency: Currency,
    settled: bool,
    balance: Balance,
    unsettled: Vec<UnsettledTransaction>,
    awaiting_confirmation: Vec<Settlement>,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout carries only the report.
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env)
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let args = Args::parse();

    let json = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("Failed to read snapshot {}", args.snapshot.display()))?;
    let snapshot = LedgerSnapshot::from_json(&json)?;
    let couple = snapshot
        .couples
        .first()
        .cloned()
        .context("Snapshot contains no couple")?;
    let store = Arc::new(InMemoryLedger::from_snapshot(snapshot)?);
    info!(couple_id = %couple.id, "Snapshot loaded");

    let user_id = args.user_id.unwrap_or(couple.user1_id);
    let currency = match args.currency {
        Some(currency) => currency,
        None => store.fetch_profile(user_id).await?.home_currency,
    };

    let provider = Arc::new(FrankfurterProvider::new(&config.rates)?);
    let rates = Arc::new(ExchangeRateService::new(
        provider,
        RateCache::from_config(&config.rates),
    ));
    let session = CoupleSession::new(couple.id, store, rates, &config);

    let balance = session.balance(user_id, currency).await?;
    if !balance.excluded.is_empty() {
        info!(
            excluded = balance.excluded.len(),
            %currency,
            "Some expenses could not be valued"
        );
    }
    let report = Report {
        user_id,
        currency,
        settled: balance.is_settled(),
        unsettled: session.unsettled(currency).await?,
        awaiting_confirmation: session.pending_for(user_id).await?,
        balance,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
