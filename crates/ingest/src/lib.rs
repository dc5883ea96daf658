// Rust guideline compliant 2026-08-14

//! Ingestion component -- normalizes SMS and notification events, extracts
//! rupee amounts, applies the fraud cutoff, and records flagged alerts
//! through the `AlertSink` port.
//!
//! Entry points: [`Ingestor::handle_sms`], [`Ingestor::handle_notification`].
//! Configuration via [`IngestConfig::builder`].

use domain::{AlertSink, FraudAlert, NotificationEvent, RawEvent, SinkError, SmsEvent};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// IngestError
// ---------------------------------------------------------------------------

/// Errors that can occur while configuring ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The supplied configuration is invalid.
    #[error("invalid ingest configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// IngestConfig + builder
// ---------------------------------------------------------------------------

/// What to do with an alert the sink refused.
///
/// The sink reports failure; the ingestor applies the policy chosen by the
/// composition root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Log the failure and drop the alert.
    LogOnly,
    /// Retry the write once, then log and drop.
    RetryOnce,
    /// Capture undelivered alerts for the caller to drain and redeliver.
    DeadLetter,
}

/// Runtime configuration for an [`Ingestor`].
///
/// Construct via [`IngestConfig::builder`].
#[derive(Debug)]
pub struct IngestConfig {
    /// Fraud cutoff in rupees; amounts strictly greater are flagged.
    pub threshold: i64,
    /// How long a flagged amount suppresses repeats. Zero disables
    /// suppression entirely.
    pub dedup_window: Duration,
    /// Failed-write handling.
    pub write_policy: WritePolicy,
}

/// Builder for [`IngestConfig`].
///
/// Obtain via [`IngestConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct IngestConfigBuilder {
    threshold: i64,
    dedup_window: Duration,
    write_policy: WritePolicy,
}

impl IngestConfig {
    /// Create a builder. `threshold` is the only required parameter.
    ///
    /// Default values: `dedup_window = 60 s`, `write_policy = LogOnly`.
    #[must_use]
    pub fn builder(threshold: i64) -> IngestConfigBuilder {
        IngestConfigBuilder {
            threshold,
            // 60 s default; Duration::ZERO disables suppression.
            dedup_window: Duration::from_secs(60),
            write_policy: WritePolicy::LogOnly,
        }
    }
}

impl IngestConfigBuilder {
    /// Override the duplicate-suppression window.
    #[must_use]
    pub fn dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Override the failed-write policy.
    #[must_use]
    pub fn write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidConfig`] when `threshold` is below 1.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<IngestConfig, IngestError> {
        if self.threshold < 1 {
            return Err(IngestError::InvalidConfig {
                reason: "threshold must be >= 1".to_owned(),
            });
        }
        Ok(IngestConfig {
            threshold: self.threshold,
            dedup_window: self.dedup_window,
            write_policy: self.write_policy,
        })
    }
}

// ---------------------------------------------------------------------------
// IngestOutcome
// ---------------------------------------------------------------------------

/// Terminal state of one inbound event.
///
/// Every event lands in exactly one of these; none of them is an error from
/// the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Notification outside the relevance filter; the scan never ran.
    Filtered,
    /// No rupee amount found in the scanned text.
    NoAmount,
    /// Amount present but not strictly above the threshold.
    BelowThreshold {
        /// The extracted amount in rupees.
        amount: i64,
    },
    /// Same amount already alerted within the dedup window.
    Duplicate {
        /// The extracted amount in rupees.
        amount: i64,
    },
    /// Alert durably recorded by the sink.
    Recorded {
        /// Identifier of the persisted alert.
        alert_id: uuid::Uuid,
    },
    /// Sink refused the alert and the policy dropped it.
    WriteFailed {
        /// Identifier of the dropped alert.
        alert_id: uuid::Uuid,
    },
    /// Sink refused the alert and it was captured in the dead-letter list.
    DeadLettered {
        /// Identifier of the captured alert.
        alert_id: uuid::Uuid,
    },
}

// ---------------------------------------------------------------------------
// Ingestor
// ---------------------------------------------------------------------------

/// Turns inbound device events into recorded fraud alerts.
///
/// Generic over the `AlertSink` port for zero-cost static dispatch; the sink
/// is injected per call, never stored. Single-task use only: internal state
/// is `RefCell`, and no borrow is held across an await point.
#[derive(Debug)]
pub struct Ingestor {
    config: IngestConfig,
    /// Flagged amounts still inside the dedup window, oldest first.
    recent: RefCell<VecDeque<(i64, Instant)>>,
    /// Alerts captured under `WritePolicy::DeadLetter`.
    dead_letters: RefCell<Vec<FraudAlert>>,
}

impl Ingestor {
    /// Create a new ingestor from `config`.
    #[must_use]
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            recent: RefCell::new(VecDeque::new()),
            dead_letters: RefCell::new(vec![]),
        }
    }

    /// Handle one SMS delivery.
    ///
    /// Segments are reassembled into the single logical body before the
    /// scan, so amounts straddling a segment boundary are still found.
    pub async fn handle_sms<S: AlertSink>(&self, event: SmsEvent, sink: &S) -> IngestOutcome {
        tracing::debug!(
            segments = event.segments.len(),
            encoding = ?event.encoding,
            "ingest.sms.received"
        );
        self.process(RawEvent::from_sms(event), sink).await
    }

    /// Handle one posted notification.
    ///
    /// Irrelevant notifications are dropped by the coarse filter before any
    /// text is scanned. For relevant ones the scan runs on the body only,
    /// while the recorded message keeps the title prefix.
    pub async fn handle_notification<S: AlertSink>(
        &self,
        event: NotificationEvent,
        sink: &S,
    ) -> IngestOutcome {
        if !event.looks_transactional() {
            tracing::debug!(source_app = %event.source_app, "ingest.notification.filtered");
            return IngestOutcome::Filtered;
        }
        tracing::debug!(source_app = %event.source_app, "ingest.notification.accepted");
        self.process(RawEvent::from_notification(event), sink).await
    }

    /// Drain alerts captured under [`WritePolicy::DeadLetter`].
    ///
    /// The caller owns redelivery; the ingestor never retries these itself.
    #[must_use]
    pub fn take_dead_letters(&self) -> Vec<FraudAlert> {
        std::mem::take(&mut *self.dead_letters.borrow_mut())
    }

    async fn process<S: AlertSink>(&self, raw: RawEvent, sink: &S) -> IngestOutcome {
        let amount = extractor::extract(&raw.text);
        if let Some(found) = amount
            && extractor::classify(amount, self.config.threshold)
        {
            return self.record(found, raw, sink).await;
        }
        match amount {
            None => {
                tracing::debug!(source = ?raw.source, "ingest.scan.no_amount");
                IngestOutcome::NoAmount
            }
            Some(found) => {
                tracing::debug!(
                    amount = found,
                    threshold = self.config.threshold,
                    "ingest.scan.below_threshold"
                );
                IngestOutcome::BelowThreshold { amount: found }
            }
        }
    }

    async fn record<S: AlertSink>(&self, amount: i64, raw: RawEvent, sink: &S) -> IngestOutcome {
        if self.is_duplicate(amount) {
            tracing::info!(amount, source = ?raw.source, "ingest.alert.duplicate_suppressed");
            return IngestOutcome::Duplicate { amount };
        }

        let alert = FraudAlert::new(raw.message);
        tracing::warn!(
            alert_id = %alert.id,
            amount,
            source = ?raw.source,
            "ingest.fraud.flagged"
        );

        match sink.write(&alert).await {
            Ok(()) => {
                self.remember(amount);
                tracing::info!(alert_id = %alert.id, "ingest.alert.recorded");
                IngestOutcome::Recorded { alert_id: alert.id }
            }
            Err(first) => self.handle_write_failure(alert, amount, &first, sink).await,
        }
    }

    async fn handle_write_failure<S: AlertSink>(
        &self,
        alert: FraudAlert,
        amount: i64,
        first: &SinkError,
        sink: &S,
    ) -> IngestOutcome {
        match self.config.write_policy {
            WritePolicy::LogOnly => {
                tracing::error!(alert_id = %alert.id, error = %first, "ingest.alert.write_failed");
                IngestOutcome::WriteFailed { alert_id: alert.id }
            }
            WritePolicy::RetryOnce => {
                tracing::warn!(alert_id = %alert.id, error = %first, "ingest.alert.retrying");
                match sink.write(&alert).await {
                    Ok(()) => {
                        self.remember(amount);
                        tracing::info!(alert_id = %alert.id, "ingest.alert.recorded_on_retry");
                        IngestOutcome::Recorded { alert_id: alert.id }
                    }
                    Err(second) => {
                        tracing::error!(
                            alert_id = %alert.id,
                            error = %second,
                            "ingest.alert.retry_failed"
                        );
                        IngestOutcome::WriteFailed { alert_id: alert.id }
                    }
                }
            }
            WritePolicy::DeadLetter => {
                // Captured alerts count as seen: a redelivered event must not
                // dead-letter the same amount twice.
                self.remember(amount);
                let alert_id = alert.id;
                let pending = {
                    let mut letters = self.dead_letters.borrow_mut();
                    letters.push(alert);
                    letters.len()
                };
                tracing::error!(
                    alert_id = %alert_id,
                    error = %first,
                    pending,
                    "ingest.alert.dead_lettered"
                );
                IngestOutcome::DeadLettered { alert_id }
            }
        }
    }

    /// Evict entries older than the window, then look for `amount`.
    fn is_duplicate(&self, amount: i64) -> bool {
        let window = self.config.dedup_window;
        let now = Instant::now();
        let mut recent = self.recent.borrow_mut();
        recent.retain(|(_, seen)| now.duration_since(*seen) < window);
        recent.iter().any(|(seen_amount, _)| *seen_amount == amount)
    }

    fn remember(&self, amount: i64) {
        // With suppression disabled nothing is retained, so skip the push.
        if self.config.dedup_window.is_zero() {
            return;
        }
        self.recent.borrow_mut().push_back((amount, Instant::now()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
