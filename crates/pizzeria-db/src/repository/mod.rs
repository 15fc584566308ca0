//! # Repository Module
//!
//! Database repository implementations for the register.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  register command                                                      │
//! │       │                                                                 │
//! │       │  db.orders().get_for_day(day_start_ms)                         │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── insert(&self, order) → id                                         │
//! │  ├── get_by_id(&self, id)        (deleted included)                    │
//! │  ├── get_for_day(&self, start)   (deleted excluded)                    │
//! │  ├── update / update_payments / soft_delete                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`order::OrderRepository`] - Order records, payments and soft delete
//! - [`transaction::TransactionRepository`] - Manual income/expense entries

pub mod order;
pub mod transaction;

use chrono::{DateTime, Utc};

/// Epoch milliseconds → timestamp. Out-of-range values clamp to the epoch.
pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
