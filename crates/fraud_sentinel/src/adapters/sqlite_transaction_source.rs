// Rust guideline compliant 2026-08-16

//! SQLite adapter for the `TransactionSource` port.
//!
//! Reads the `transactions` table that backs the spend chart. Amounts are
//! stored as decimal strings and parsed exactly; a malformed amount is
//! logged and skipped rather than failing the whole fetch, so one damaged
//! row cannot blank the chart.

use domain::{SourceError, TransactionRecord, TransactionSource};
use rust_decimal::Decimal;
use sqlx::Row as _;

/// First-run demo history: a few days of ordinary spending, one legacy row
/// without a date.
const DEMO_ROWS: &[(Option<&str>, &str)] = &[
    (Some("2026-08-10"), "1250.00"),
    (Some("2026-08-10"), "349.50"),
    (Some("2026-08-11"), "89.99"),
    (Some("2026-08-12"), "4800.00"),
    (Some("2026-08-12"), "120.25"),
    (Some("2026-08-13"), "2300.00"),
    (Some("2026-08-14"), "15.75"),
    (Some("2026-08-15"), "660.00"),
    (None, "512.00"),
];

/// Transaction history backed by the shared SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteTransactionSource {
    pool: sqlx::SqlitePool,
}

impl SqliteTransactionSource {
    /// Bind to an existing pool and ensure the `transactions` table exists.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` when schema creation fails.
    pub async fn new(pool: sqlx::SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS transactions (
                date   TEXT,           -- YYYY-MM-DD; NULL on legacy rows
                amount TEXT NOT NULL   -- decimal string, parsed exactly
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// Seed the demo history on first run; a table with rows is left alone.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` when the count or an insert fails.
    pub async fn seed_demo_rows(&self) -> Result<(), sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }
        for (date, amount) in DEMO_ROWS {
            sqlx::query("INSERT INTO transactions (date, amount) VALUES (?, ?)")
                .bind(*date)
                .bind(*amount)
                .execute(&self.pool)
                .await?;
        }
        tracing::info!(rows = DEMO_ROWS.len(), "sqlite.transactions.seeded");
        Ok(())
    }
}

impl TransactionSource for SqliteTransactionSource {
    /// Every stored row, with malformed amounts logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` when the query itself fails or a
    /// column cannot be decoded.
    async fn fetch_all(&self) -> Result<Vec<TransactionRecord>, SourceError> {
        let rows = sqlx::query("SELECT date, amount FROM transactions")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "sqlite.transactions.fetch");
                SourceError::Unavailable
            })?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let date: Option<String> = row.try_get("date").map_err(|e| {
                tracing::error!(error = %e, "sqlite.transactions.decode");
                SourceError::Unavailable
            })?;
            let amount_text: String = row.try_get("amount").map_err(|e| {
                tracing::error!(error = %e, "sqlite.transactions.decode");
                SourceError::Unavailable
            })?;
            match amount_text.parse::<Decimal>() {
                Ok(amount) => records.push(TransactionRecord { date, amount }),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        amount = %amount_text,
                        "sqlite.transactions.bad_amount_skipped"
                    );
                }
            }
        }
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{DEMO_ROWS, SqliteTransactionSource};
    use domain::TransactionSource as _;
    use rust_decimal::Decimal;

    async fn make_source() -> SqliteTransactionSource {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:")
            .await
            .expect("in-memory SQLite should open");
        SqliteTransactionSource::new(pool)
            .await
            .expect("schema creation should succeed")
    }

    async fn insert(source: &SqliteTransactionSource, date: Option<&str>, amount: &str) {
        sqlx::query("INSERT INTO transactions (date, amount) VALUES (?, ?)")
            .bind(date)
            .bind(amount)
            .execute(&source.pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fresh_table_fetches_empty() {
        let source = make_source().await;
        assert!(source.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_returns_inserted_rows() {
        let source = make_source().await;
        insert(&source, Some("2025-06-21"), "100.00").await;
        insert(&source, Some("2025-06-22"), "10").await;

        let records = source.fetch_all().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date.as_deref(), Some("2025-06-21"));
        assert_eq!(records[0].amount, Decimal::new(100, 0));
        assert_eq!(records[1].amount, Decimal::new(10, 0));
    }

    #[tokio::test]
    async fn null_dates_come_back_as_none() {
        let source = make_source().await;
        insert(&source, None, "512.00").await;

        let records = source.fetch_all().await.unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].date.is_none());
    }

    #[tokio::test]
    async fn malformed_amount_is_skipped_not_fatal() {
        let source = make_source().await;
        insert(&source, Some("2025-06-21"), "not-a-number").await;
        insert(&source, Some("2025-06-21"), "42.50").await;

        let records = source.fetch_all().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, Decimal::new(4250, 2));
    }

    #[tokio::test]
    async fn amounts_parse_exactly() {
        let source = make_source().await;
        insert(&source, Some("2025-06-21"), "0.10").await;

        let records = source.fetch_all().await.unwrap();

        assert_eq!(records[0].amount, Decimal::new(10, 2));
    }

    #[tokio::test]
    async fn seed_fills_an_empty_table_once() {
        let source = make_source().await;
        source.seed_demo_rows().await.unwrap();
        source.seed_demo_rows().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&source.pool)
            .await
            .unwrap();

        assert_eq!(count, i64::try_from(DEMO_ROWS.len()).unwrap());
    }

    #[tokio::test]
    async fn seed_leaves_existing_rows_alone() {
        let source = make_source().await;
        insert(&source, Some("2025-06-21"), "1.00").await;

        source.seed_demo_rows().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&source.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
