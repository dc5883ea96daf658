// Rust guideline compliant 2026-08-12

//! Currency-amount extraction and threshold classification.
//!
//! Two pure functions shared by every ingestion path: `extract` scans free
//! text for the first rupee amount, `classify` applies the fraud cutoff.
//! Neither ever fails; absence is `None` and `false`.

use std::sync::LazyLock;

use regex::Regex;

/// First rupee mention: `₹`, at most one whitespace, then digits with
/// optional comma group separators.
static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹\s?([0-9,]+)").expect("amount pattern is valid"));

/// Scan `text` for the first rupee amount and parse it to whole rupees.
///
/// Group separators are stripped before parsing, so `"₹1,23,456"` and
/// `"₹123456"` read the same amount. Later mentions in the same text are
/// ignored. Returns `None` when no rupee mention is present, when the
/// matched span carries no digits, or when the digits overflow `i64`.
#[must_use]
pub fn extract(text: &str) -> Option<i64> {
    let captures = AMOUNT_PATTERN.captures(text)?;
    let digits = captures.get(1)?.as_str().replace(',', "");
    digits.parse::<i64>().ok()
}

/// `true` only when an amount is present and strictly greater than `threshold`.
///
/// An exact-threshold amount is not flagged, and absence never is.
#[must_use]
pub fn classify(amount: Option<i64>, threshold: i64) -> bool {
    amount.is_some_and(|rupees| rupees > threshold)
}
