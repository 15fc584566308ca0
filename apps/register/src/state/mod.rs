//! # State Module
//!
//! What the register holds between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │    Database      │  │  OrderSession    │  │   RegisterConfig     │  │
//! │  │  (pizzeria-db)   │  │                  │  │                      │  │
//! │  │  SQLite pool     │  │  Catalog + Cart  │  │  store, printer,     │  │
//! │  │                  │  │  (&mut, no lock) │  │  database path       │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  • Database: internal connection pool, cheap to clone                  │
//! │  • OrderSession: one checkout at a time per terminal                   │
//! │  • RegisterConfig: read-only after startup                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{DatabaseSettings, PrinterSettings, RegisterConfig, StoreSettings};
pub use session::OrderSession;
