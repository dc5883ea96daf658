// Rust guideline compliant 2026-08-14

//! Alert feed -- broadcasts the full alert history to subscribers whenever
//! the store changes.
//!
//! Entry points: [`AlertFeed::subscribe`], [`AlertFeed::run`]. Each publish
//! replaces the previous snapshot, so a slow subscriber observes the latest
//! state rather than a backlog.

use domain::{AlertQuery, FraudAlert, SinkError, SinkWatch};
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// FeedError
// ---------------------------------------------------------------------------

/// Errors that stop the feed loop.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The alert history could not be queried; the feed stops updating and
    /// subscribers keep the last published snapshot.
    #[error("feed query error: {0}")]
    Query(#[from] SinkError),
}

// ---------------------------------------------------------------------------
// AlertSnapshot
// ---------------------------------------------------------------------------

/// One published view of the alert history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertSnapshot {
    /// Monotonic publish counter; revision 0 is the pre-run empty snapshot.
    pub revision: u64,
    /// Complete alert history, newest first.
    pub alerts: Vec<FraudAlert>,
}

// ---------------------------------------------------------------------------
// AlertFeed
// ---------------------------------------------------------------------------

/// Re-queries the store on every change signal and publishes the result to
/// all subscribers.
///
/// Generic over the `SinkWatch` and `AlertQuery` ports for zero-cost static
/// dispatch; both are injected into [`run`](Self::run), never stored.
#[derive(Debug)]
pub struct AlertFeed {
    tx: watch::Sender<AlertSnapshot>,
}

impl AlertFeed {
    /// Create a feed holding the empty revision-0 snapshot.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _initial_rx) = watch::channel(AlertSnapshot::default());
        Self { tx }
    }

    /// Register a subscriber.
    ///
    /// The subscription starts at the feed's current snapshot; every
    /// subsequent publish is observable through
    /// [`FeedSubscription::changed`]. Dropping the subscription releases it.
    #[must_use]
    pub fn subscribe(&self) -> FeedSubscription {
        FeedSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish once, then republish on every store change until the store
    /// closes.
    ///
    /// The initial publish makes pre-existing history visible without
    /// waiting for a first change.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Query`] when the history cannot be read; the
    /// last published snapshot stays in place for subscribers.
    pub async fn run<W, Q>(&self, changes: &mut W, query: &Q) -> Result<(), FeedError>
    where
        W: SinkWatch,
        Q: AlertQuery,
    {
        self.publish(query).await?;
        loop {
            match changes.changed().await {
                Ok(()) => self.publish(query).await?,
                Err(SinkError::Closed) => {
                    tracing::info!("feed.run.stopped: store closed");
                    return Ok(());
                }
                Err(e) => return Err(FeedError::Query(e)),
            }
        }
    }

    async fn publish<Q: AlertQuery>(&self, query: &Q) -> Result<(), FeedError> {
        let alerts = query.list_descending().await?;
        let count = alerts.len();
        let mut revision = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.revision += 1;
            snapshot.alerts = alerts;
            revision = snapshot.revision;
        });
        tracing::debug!(revision, count, "feed.snapshot.published");
        Ok(())
    }
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// FeedSubscription
// ---------------------------------------------------------------------------

/// A live view onto the feed.
///
/// Holds one receiver slot; dropping it is the unsubscribe.
#[derive(Debug)]
pub struct FeedSubscription {
    rx: watch::Receiver<AlertSnapshot>,
}

impl FeedSubscription {
    /// The snapshot most recently published (or the empty revision-0
    /// snapshot before the first publish).
    #[must_use]
    pub fn current(&self) -> AlertSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next publish and return it.
    ///
    /// Intermediate snapshots may be skipped; the returned one is always
    /// the latest. Returns `None` once the feed has been dropped.
    pub async fn changed(&mut self) -> Option<AlertSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
