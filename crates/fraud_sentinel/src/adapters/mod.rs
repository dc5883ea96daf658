// Rust guideline compliant 2026-08-16

//! Concrete adapters for the hexagonal ports, plus the demo event source.
//!
//! Everything here lives outside the component crates: the components only
//! ever see the port traits from `domain`.

pub mod demo_events;
pub mod sqlite_alert_store;
pub mod sqlite_transaction_source;
