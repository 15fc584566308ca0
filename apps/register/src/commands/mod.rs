//! # Register Commands
//!
//! Each command takes the state it needs explicitly and returns
//! `AppResult<T>`; the CLI in `main.rs` is a thin wrapper around them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  order.rs  checkout, record_payment, void_order, reprint               │
//! │  caja.rs   daily_summary, add_transaction, delete_transaction          │
//! │  demo.rs   sample order for the `demo` subcommand                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod caja;
pub mod demo;
pub mod order;

pub use caja::{add_transaction, daily_summary, day_start_ms, delete_transaction, local_today};
pub use order::{
    checkout, customer_from_input, record_payment, reprint, void_order, PaymentResponse,
    TicketKind,
};
