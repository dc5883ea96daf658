// Rust guideline compliant 2026-08-16

//! SQLite adapter for the `AlertSink`, `AlertQuery`, and `SinkWatch` ports.
//!
//! Persists `FraudAlert` rows to a SQLite file via `sqlx` and publishes a
//! change signal after every committed write so the feed can re-query.
//!
//! # `INSERT` semantics
//!
//! The table is append-only: plain `INSERT`, no overwrite. A duplicate id
//! violates the primary key and surfaces as `SinkError::Unavailable`, which
//! the ingestor's write policy then handles.
//!
//! # Ordering
//!
//! `list_descending` orders by `timestamp_ms DESC, rowid DESC`. Timestamps
//! are stored at millisecond precision, so the `rowid` tiebreak keeps the
//! ordering total when two alerts land in the same millisecond.

use domain::{AlertQuery, AlertSink, FraudAlert, SinkError, SinkWatch};
use sqlx::Row as _;
use tokio::sync::watch;

/// Alert store backed by a SQLite database file via `sqlx`.
///
/// Connects to (or creates) a SQLite file and ensures the `fraud_alerts`
/// table exists. Cloning shares the pool and the change signal.
#[derive(Debug, Clone)]
pub struct SqliteAlertStore {
    pool: sqlx::SqlitePool,
    changes: watch::Sender<u64>,
}

impl SqliteAlertStore {
    /// Open or create a SQLite database and initialize the schema.
    ///
    /// Passes `create_if_missing(true)` so the database file is created on
    /// first run without manual setup. The `fraud_alerts` table is created
    /// via `CREATE TABLE IF NOT EXISTS`, making repeated calls safe.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` when the connection or schema creation fails.
    pub async fn new(db_url: &str) -> Result<Self, sqlx::Error> {
        // create_if_missing: sqlx 0.8 defaults to false for file databases;
        // enable explicitly so the demo works out of the box on first run.
        let opts = db_url
            .parse::<sqlx::sqlite::SqliteConnectOptions>()?
            .create_if_missing(true);
        let pool = sqlx::SqlitePool::connect_with(opts).await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS fraud_alerts (
                id           TEXT    PRIMARY KEY,
                message      TEXT    NOT NULL,
                timestamp_ms INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        let (changes, _initial_rx) = watch::channel(0_u64);
        Ok(Self { pool, changes })
    }

    /// Change signal for this store, for the feed's `SinkWatch` port.
    ///
    /// `changed` resolves once per write committed after the previous call
    /// and reports `Closed` when the store is dropped.
    #[must_use]
    pub fn watch(&self) -> StoreWatch {
        StoreWatch {
            rx: self.changes.subscribe(),
        }
    }

    /// Handle to the underlying pool, for adapters sharing the database
    /// file. Pool handles are cheap to clone.
    #[must_use]
    pub fn pool(&self) -> sqlx::SqlitePool {
        self.pool.clone()
    }
}

impl AlertSink for SqliteAlertStore {
    /// Append one alert row, then publish the change signal.
    ///
    /// Timestamps are stored as UTC milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Unavailable` on any `sqlx` error (connection
    /// failure, disk full, constraint violation, etc.). The underlying
    /// error is logged at `error` level before mapping.
    async fn write(&self, alert: &FraudAlert) -> Result<(), SinkError> {
        sqlx::query("INSERT INTO fraud_alerts (id, message, timestamp_ms) VALUES (?, ?, ?)")
            .bind(alert.id.to_string())
            .bind(&alert.message)
            .bind(alert.timestamp.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "sqlite.alert_write");
                SinkError::Unavailable
            })?;
        self.changes.send_modify(|revision| *revision += 1);
        Ok(())
    }
}

impl AlertQuery for SqliteAlertStore {
    /// Full alert history, newest first (see module-level ordering note).
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Unavailable` when the query fails or a row
    /// cannot be decoded.
    async fn list_descending(&self) -> Result<Vec<FraudAlert>, SinkError> {
        let rows = sqlx::query(
            "SELECT id, message, timestamp_ms FROM fraud_alerts
             ORDER BY timestamp_ms DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "sqlite.alert_list");
            SinkError::Unavailable
        })?;
        rows.iter().map(row_to_alert).collect()
    }
}

/// Decode one `fraud_alerts` row.
///
/// Ids and timestamps are written by this adapter, so a row that fails to
/// decode means the file was edited out-of-band; the store reports itself
/// unavailable rather than serving a partial history.
fn row_to_alert(row: &sqlx::sqlite::SqliteRow) -> Result<FraudAlert, SinkError> {
    let id_text: String = row.try_get("id").map_err(decode_error)?;
    let id = uuid::Uuid::parse_str(&id_text).map_err(decode_error)?;
    let message: String = row.try_get("message").map_err(decode_error)?;
    let timestamp_ms: i64 = row.try_get("timestamp_ms").map_err(decode_error)?;
    let timestamp = chrono::DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
        tracing::error!(timestamp_ms, "sqlite.alert_row.bad_timestamp");
        SinkError::Unavailable
    })?;
    Ok(FraudAlert {
        id,
        message,
        timestamp,
    })
}

/// Log the decode failure, then collapse it to the opaque port error.
fn decode_error<E: std::fmt::Display>(e: E) -> SinkError {
    tracing::error!(error = %e, "sqlite.alert_row.decode");
    SinkError::Unavailable
}

/// Receiving end of the store's change signal.
#[derive(Debug)]
pub struct StoreWatch {
    rx: watch::Receiver<u64>,
}

impl SinkWatch for StoreWatch {
    /// Wait for the next committed write.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Closed` once the store (the sending side) has
    /// been dropped.
    async fn changed(&mut self) -> Result<(), SinkError> {
        match self.rx.changed().await {
            Ok(()) => Ok(()),
            Err(_sender_dropped) => Err(SinkError::Closed),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
