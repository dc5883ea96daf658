// Rust guideline compliant 2026-08-12

//! Shared domain types for the fraud-signal pipeline.
//!
//! Defines the inbound event types (`SmsEvent`, `NotificationEvent`,
//! `RawEvent`), the `FraudAlert` record, the spend types, and the hexagonal
//! port traits: `AlertSink`, `AlertQuery`, `SinkWatch`, and
//! `TransactionSource`. All pipeline components depend on this crate; no
//! component crate is imported here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Fraud threshold in rupees. Amounts strictly greater are flagged.
///
/// Compiled in deliberately: the cutoff is a product decision, not a
/// deployment knob.
pub const FRAUD_THRESHOLD: i64 = 50_000;

/// Which ingestion path produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Device SMS delivery.
    Sms,
    /// Posted notification from another app.
    Notification,
}

/// Wire encoding of an SMS delivery.
///
/// Carried for logging only; both encodings decode to `String` segments
/// before they reach the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsEncoding {
    /// 7-bit GSM default alphabet.
    Gsm7,
    /// UCS-2 (messages with non-Latin script).
    Ucs2,
}

/// One SMS delivery, possibly split across several segments.
///
/// Long messages arrive as multiple segments of a single delivery, already
/// in order. `reassemble` joins them into the one logical body the rest of
/// the pipeline operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsEvent {
    /// Segment encoding, as reported by the transport.
    pub encoding: SmsEncoding,
    /// Decoded segment bodies in delivery order.
    pub segments: Vec<String>,
}

impl SmsEvent {
    /// Join all segments into the single logical message body.
    ///
    /// A currency amount may straddle a segment boundary, so scanning must
    /// always run on the reassembled body, never per segment.
    #[must_use]
    pub fn reassemble(&self) -> String {
        self.segments.concat()
    }
}

/// One posted notification from another app on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    /// Package identifier of the posting app.
    pub source_app: String,
    /// Notification title, absent for some apps.
    pub title: Option<String>,
    /// Notification body text.
    pub body: String,
}

impl NotificationEvent {
    /// Coarse relevance filter: messaging apps and transaction-titled
    /// notifications pass, everything else is dropped before extraction.
    ///
    /// Matching is case-insensitive on both the package name and the title.
    #[must_use]
    pub fn looks_transactional(&self) -> bool {
        self.source_app.to_lowercase().contains("sms")
            || self
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains("transaction"))
    }

    /// Human-review message for a flagged notification: `"title: body"`,
    /// or the body alone when the title is absent or empty.
    #[must_use]
    pub fn alert_message(&self) -> String {
        match self.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("{title}: {}", self.body),
            None => self.body.clone(),
        }
    }
}

/// A source-neutral event ready for amount extraction.
///
/// `text` is what the extractor scans; `message` is what a flagged alert
/// carries. The two differ for notifications, where the title joins the
/// persisted message but never takes part in the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Ingestion path that produced the event.
    pub source: SourceKind,
    /// Text scanned for a currency amount.
    pub text: String,
    /// Text persisted on the alert when the event is flagged.
    pub message: String,
}

impl RawEvent {
    /// Build from a reassembled SMS delivery; body and message coincide.
    #[must_use]
    pub fn from_sms(event: SmsEvent) -> Self {
        let body = event.reassemble();
        Self {
            source: SourceKind::Sms,
            text: body.clone(),
            message: body,
        }
    }

    /// Build from a notification; the scan runs on the body only.
    #[must_use]
    pub fn from_notification(event: NotificationEvent) -> Self {
        let message = event.alert_message();
        Self {
            source: SourceKind::Notification,
            text: event.body,
            message,
        }
    }
}

/// A persisted fraud alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FraudAlert {
    /// Unique identifier (UUID v4), assigned at build time.
    pub id: uuid::Uuid,
    /// Human-readable alert text; never empty for pipeline-built alerts.
    pub message: String,
    /// Creation time in UTC, captured at build time.
    pub timestamp: DateTime<Utc>,
}

impl FraudAlert {
    /// Build a fresh alert: new random id, current UTC timestamp.
    ///
    /// Building never fails; persistence is the sink's concern.
    #[must_use]
    pub fn new(message: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// One historical transaction row, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Calendar day in `YYYY-MM-DD` form; `None` for legacy rows without one.
    pub date: Option<String>,
    /// Amount in rupees. Decimal, so per-day sums stay exact.
    pub amount: Decimal,
}

/// Total spend for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySpend {
    /// Calendar day in `YYYY-MM-DD` form.
    pub date: String,
    /// Sum of all amounts recorded for that day.
    pub total: Decimal,
}

/// Errors from the alert store ports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The store could not complete the write or query.
    #[error("alert store unavailable")]
    Unavailable,
    /// The store has been dropped; no further change signals will arrive.
    #[error("alert store closed")]
    Closed,
}

/// Errors from the transaction history port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The backing store could not be read.
    #[error("transaction source unavailable")]
    Unavailable,
}

/// Hexagonal port: append-only alert persistence.
///
/// Implementations live outside the component crates (e.g. in the binary
/// crate). The ingestor depends exclusively on this trait -- never on a
/// concrete adapter.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait AlertSink {
    /// Durably append one alert record.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Unavailable` when the write cannot be completed.
    /// The caller decides what to do with the undelivered alert.
    async fn write(&self, alert: &FraudAlert) -> Result<(), SinkError>;
}

/// Hexagonal port: read access to the full alert history.
///
/// The feed depends exclusively on this trait -- never on a concrete store.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait AlertQuery {
    /// Full alert history, newest first.
    ///
    /// Ordering is total: alerts sharing a timestamp come back in reverse
    /// insertion order.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Unavailable` when the query cannot be completed.
    async fn list_descending(&self) -> Result<Vec<FraudAlert>, SinkError>;
}

/// Hexagonal port: change signal for the alert store.
///
/// One call resolves per store change (or batch of changes); the feed
/// re-queries on each resolution.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait SinkWatch {
    /// Wait until the store has changed since the last call.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Closed` once the store is gone; no further
    /// signals will ever arrive.
    async fn changed(&mut self) -> Result<(), SinkError>;
}

/// Hexagonal port: transaction history for spend aggregation.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait TransactionSource {
    /// Every stored transaction row, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` when the history cannot be read.
    async fn fetch_all(&self) -> Result<Vec<TransactionRecord>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    // ------------------------------------------------------------------
    // Data types
    // ------------------------------------------------------------------

    #[test]
    fn fraud_alert_new_assigns_id_and_timestamp() {
        let before = Utc::now();
        let alert = FraudAlert::new("₹60,000 debited".to_owned());
        let after = Utc::now();
        assert!(!alert.id.is_nil());
        assert_eq!(alert.message, "₹60,000 debited");
        assert!(alert.timestamp >= before && alert.timestamp <= after);
    }

    #[test]
    fn fraud_alert_ids_distinct_at_scale() {
        let ids: HashSet<uuid::Uuid> =
            (0..10_000).map(|_| FraudAlert::new("x".to_owned()).id).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn sms_reassemble_joins_segments_in_order() {
        let event = SmsEvent {
            encoding: SmsEncoding::Gsm7,
            segments: vec!["Paid ₹1,2".to_owned(), "3,456 at Variety Mart".to_owned()],
        };
        assert_eq!(event.reassemble(), "Paid ₹1,23,456 at Variety Mart");
    }

    #[test]
    fn sms_reassemble_single_and_empty() {
        let single = SmsEvent {
            encoding: SmsEncoding::Ucs2,
            segments: vec!["hello".to_owned()],
        };
        assert_eq!(single.reassemble(), "hello");
        let empty = SmsEvent {
            encoding: SmsEncoding::Gsm7,
            segments: vec![],
        };
        assert_eq!(empty.reassemble(), "");
    }

    #[test]
    fn notification_filter_matches_sms_package() {
        let event = NotificationEvent {
            source_app: "com.android.SMS".to_owned(),
            title: None,
            body: "anything".to_owned(),
        };
        assert!(event.looks_transactional());
    }

    #[test]
    fn notification_filter_matches_transaction_title() {
        let event = NotificationEvent {
            source_app: "com.bank.app".to_owned(),
            title: Some("Transaction alert".to_owned()),
            body: "anything".to_owned(),
        };
        assert!(event.looks_transactional());
    }

    #[test]
    fn notification_filter_rejects_unrelated() {
        let event = NotificationEvent {
            source_app: "com.chat.app".to_owned(),
            title: Some("Lunch?".to_owned()),
            body: "₹99,999 is not even scanned".to_owned(),
        };
        assert!(!event.looks_transactional());
    }

    #[test]
    fn notification_message_prefixes_title() {
        let event = NotificationEvent {
            source_app: "sms".to_owned(),
            title: Some("HDFC".to_owned()),
            body: "₹70,000 debited".to_owned(),
        };
        assert_eq!(event.alert_message(), "HDFC: ₹70,000 debited");
    }

    #[test]
    fn notification_message_without_title_is_body_alone() {
        let titleless = NotificationEvent {
            source_app: "sms".to_owned(),
            title: None,
            body: "₹70,000 debited".to_owned(),
        };
        assert_eq!(titleless.alert_message(), "₹70,000 debited");
        let empty_title = NotificationEvent {
            title: Some(String::new()),
            ..titleless
        };
        assert_eq!(empty_title.alert_message(), "₹70,000 debited");
    }

    #[test]
    fn raw_event_from_sms_uses_reassembled_body_twice() {
        let event = SmsEvent {
            encoding: SmsEncoding::Gsm7,
            segments: vec!["₹5".to_owned(), "00 spent".to_owned()],
        };
        let raw = RawEvent::from_sms(event);
        assert_eq!(raw.source, SourceKind::Sms);
        assert_eq!(raw.text, "₹500 spent");
        assert_eq!(raw.message, "₹500 spent");
    }

    #[test]
    fn raw_event_from_notification_scans_body_only() {
        let event = NotificationEvent {
            source_app: "sms".to_owned(),
            title: Some("Alert".to_owned()),
            body: "₹500 spent".to_owned(),
        };
        let raw = RawEvent::from_notification(event);
        assert_eq!(raw.source, SourceKind::Notification);
        assert_eq!(raw.text, "₹500 spent");
        assert_eq!(raw.message, "Alert: ₹500 spent");
    }

    #[test]
    fn transaction_record_fields() {
        let rec = TransactionRecord {
            date: Some("2025-06-21".to_owned()),
            amount: Decimal::new(15050, 2),
        };
        assert_eq!(rec.date.as_deref(), Some("2025-06-21"));
        assert_eq!(rec.amount.to_string(), "150.50");
    }

    #[test]
    fn sink_error_variants() {
        let unavailable = SinkError::Unavailable;
        let closed = SinkError::Closed;
        assert_eq!(unavailable.to_string(), "alert store unavailable");
        assert_eq!(closed.to_string(), "alert store closed");
        assert_ne!(unavailable, closed);
    }

    #[test]
    fn source_error_display() {
        assert_eq!(
            SourceError::Unavailable.to_string(),
            "transaction source unavailable"
        );
    }

    // ------------------------------------------------------------------
    // Port traits -- compile checks with minimal implementations
    // ------------------------------------------------------------------

    /// Verify that a minimal `AlertSink` implementation stores alerts correctly.
    #[tokio::test]
    async fn alert_sink_impl() {
        struct TestSink {
            inner: RefCell<Vec<FraudAlert>>,
        }

        impl AlertSink for TestSink {
            async fn write(&self, alert: &FraudAlert) -> Result<(), SinkError> {
                self.inner.borrow_mut().push(alert.clone());
                Ok(())
            }
        }

        let sink = TestSink {
            inner: RefCell::new(vec![]),
        };
        let alert = FraudAlert::new("test".to_owned());
        sink.write(&alert).await.unwrap();
        assert_eq!(sink.inner.borrow().len(), 1);
        assert_eq!(sink.inner.borrow()[0], alert);
    }

    /// Verify that the read-side port traits compile with a minimal implementation.
    #[tokio::test]
    async fn port_trait_struct_impl() {
        struct AllPorts;

        impl AlertQuery for AllPorts {
            async fn list_descending(&self) -> Result<Vec<FraudAlert>, SinkError> {
                Ok(vec![])
            }
        }

        impl SinkWatch for AllPorts {
            async fn changed(&mut self) -> Result<(), SinkError> {
                Err(SinkError::Closed)
            }
        }

        impl TransactionSource for AllPorts {
            async fn fetch_all(&self) -> Result<Vec<TransactionRecord>, SourceError> {
                Ok(vec![TransactionRecord {
                    date: None,
                    amount: Decimal::new(100, 0),
                }])
            }
        }

        let mut ports = AllPorts;
        let alerts = ports.list_descending().await.unwrap();
        assert!(alerts.is_empty());
        assert_eq!(ports.changed().await, Err(SinkError::Closed));
        let records = ports.fetch_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].date.is_none());
    }
}
