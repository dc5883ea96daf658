// Rust guideline compliant 2026-08-14

//! Spend aggregation -- folds the transaction history into per-day totals
//! for the spending chart.
//!
//! Entry points: [`SpendAggregator::refresh`], [`SpendAggregator::aggregate`].

use domain::{DailySpend, SourceError, TransactionRecord, TransactionSource};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Errors that can occur while refreshing the spend series.
#[derive(Debug, thiserror::Error)]
pub enum SpendError {
    /// The transaction history could not be read.
    #[error("spend source error: {0}")]
    Source(#[from] SourceError),
}

/// Folds transaction rows into one total per calendar day.
///
/// Generic over the `TransactionSource` port for zero-cost static dispatch;
/// the source is injected per call, never stored.
#[derive(Debug)]
pub struct SpendAggregator;

impl SpendAggregator {
    /// Create a new aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Fetch the full history through the port and aggregate it.
    ///
    /// # Errors
    ///
    /// Returns [`SpendError::Source`] when the history cannot be read.
    pub async fn refresh<S: TransactionSource>(
        &self,
        source: &S,
    ) -> Result<Vec<DailySpend>, SpendError> {
        let records = source.fetch_all().await?;
        tracing::debug!(rows = records.len(), "spend.history.fetched");
        Ok(self.aggregate(records))
    }

    /// Group records by their exact date string and sum the amounts.
    ///
    /// Days come back in ascending lexical date order, which for `YYYY-MM-DD`
    /// keys is chronological. Rows without a date are skipped, not summed
    /// under a placeholder day. Sums are decimal, so fractional amounts add
    /// without drift.
    #[must_use]
    pub fn aggregate(&self, records: Vec<TransactionRecord>) -> Vec<DailySpend> {
        let mut skipped = 0_usize;
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for record in records {
            match record.date {
                Some(date) => {
                    *totals.entry(date).or_insert(Decimal::ZERO) += record.amount;
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "spend.aggregate.dateless_rows_skipped");
        }
        totals
            .into_iter()
            .map(|(date, total)| DailySpend { date, total })
            .collect()
    }
}

impl Default for SpendAggregator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
