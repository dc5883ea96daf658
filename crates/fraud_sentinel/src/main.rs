// Rust guideline compliant 2026-08-18

//! Fraud sentinel entry point -- demo pipeline over a SQLite-backed alert
//! store.
//!
//! Wires the seeded demo event source into the ingestor, runs the alert
//! feed off the store's change signal, and mirrors every published
//! snapshot to the console. The spend series is aggregated once at startup
//! from the seeded transaction history.
//!
//! # Usage
//!
//! ```text
//! # Infinite mode -- press CTRL+C to stop
//! RUST_LOG=info cargo run --bin fraud_sentinel
//!
//! # Also show per-event debug output
//! RUST_LOG=debug cargo run --bin fraud_sentinel
//! ```
//!
//! The file `fraud_sentinel.db` is created on first run. `SENTINEL_DB`
//! overrides the database URL; `SENTINEL_THEME` (`dark` / `light`) forces
//! the console appearance.

mod adapters;
mod console;
mod theme;

use adapters::demo_events::{DemoEventSource, InboundEvent};
use adapters::sqlite_alert_store::SqliteAlertStore;
use adapters::sqlite_transaction_source::SqliteTransactionSource;
use anyhow::Context as _;
use console::ConsoleUi;
use feed::AlertFeed;
use ingest::{IngestConfig, Ingestor, WritePolicy};
use spend::SpendAggregator;
use std::time::Duration;
use theme::ThemePreference;
use tracing::Instrument as _;

/// Database URL used when `SENTINEL_DB` is unset.
///
/// Using the current working directory is acceptable for a demo binary.
const DEFAULT_DB_URL: &str = "sqlite:fraud_sentinel.db";

/// Pause between synthesized demo events; keeps logs readable in real time.
const EVENT_INTERVAL: Duration = Duration::from_millis(500);

/// The demo console has no system appearance to query; assume light.
const SYSTEM_DARK: bool = false;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let db_url = std::env::var("SENTINEL_DB").unwrap_or_else(|_| DEFAULT_DB_URL.to_owned());
    let ui = ConsoleUi::new(ThemePreference::from_env().resolve(SYSTEM_DARK));

    // -- Alert store: shared by the ingestor (write) and the feed (read) --
    let store = SqliteAlertStore::new(&db_url)
        .await
        .context("failed to open alert store")?;
    let mut store_changes = store.watch();

    // -- Spend series: seeded history, aggregated once at startup --
    let transactions = SqliteTransactionSource::new(store.pool())
        .await
        .context("failed to open transaction history")?;
    transactions
        .seed_demo_rows()
        .await
        .context("failed to seed transaction history")?;
    let aggregator = SpendAggregator::new();
    let series = aggregator
        .refresh(&transactions)
        .await
        .context("failed to aggregate spend history")?;
    println!("{}", ui.render_spend(&series));

    // -- Ingestor: compiled-in threshold; retry a failed write once --
    let ingest_config = IngestConfig::builder(domain::FRAUD_THRESHOLD)
        .write_policy(WritePolicy::RetryOnce)
        .build()
        .context("failed to build ingest config")?;
    let ingestor = Ingestor::new(ingest_config);
    let events = DemoEventSource::new(None);

    // -- Feed: one console subscriber, registered before the loops start --
    let alert_feed = AlertFeed::new();
    let mut subscription = alert_feed.subscribe();

    let ingest_loop = async {
        loop {
            let outcome = match events.next_event() {
                InboundEvent::Sms(event) => ingestor.handle_sms(event, &store).await,
                InboundEvent::Notification(event) => {
                    ingestor.handle_notification(event, &store).await
                }
            };
            tracing::debug!(?outcome, "main.event.handled");
            tokio::time::sleep(EVENT_INTERVAL).await;
        }
    };

    let feed_loop = async {
        // A query failure stops updates; subscribers keep the last snapshot.
        if let Err(e) = alert_feed.run(&mut store_changes, &store).await {
            tracing::error!(error = %e, "main.feed.stopped");
        }
    };

    let console_loop = async {
        while let Some(snapshot) = subscription.changed().await {
            println!("{}", ui.render_snapshot(&snapshot));
        }
    };

    let pipeline = async {
        // tokio::join! polls all three loops concurrently on this thread.
        tokio::join!(
            ingest_loop.instrument(tracing::info_span!("ingest")),
            feed_loop.instrument(tracing::info_span!("feed")),
            console_loop.instrument(tracing::info_span!("console")),
        );
    };

    // Race the pipeline against CTRL+C.
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("main.shutdown: ctrl_c received");
        }
        () = pipeline => {}
    }

    Ok(())
}
