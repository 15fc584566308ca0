//! # pizzeria-core: Pure Business Logic for the Pizzeria Register
//!
//! Cart math, combo pizzas, order payload mapping, the daily caja snapshot
//! and ticket text. Everything here is a pure function of its inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pizzeria Register Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  register (CLI / order session)                 │   │
//! │  │   checkout, pay, void, reprint, caja, income/expense           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ pizzeria-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌────────┐ ┌────────┐ ┌─────────┐ ┌──────────┐  │   │
//! │  │   │ catalog │ │  cart  │ │ combo  │ │  order  │ │  stats   │  │   │
//! │  │   │  menu   │ │ lines  │ │ slots  │ │ mapper  │ │  caja    │  │   │
//! │  │   └─────────┘ └────────┘ └────────┘ └─────────┘ └──────────┘  │   │
//! │  │   ┌─────────┐ ┌────────┐ ┌────────────┐ ┌─────────┐           │   │
//! │  │   │ ticket  │ │ money  │ │ validation │ │ printer │           │   │
//! │  │   └─────────┘ └────────┘ └────────────┘ └─────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 pizzeria-db (Database Layer)                    │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Menu table: pizzas, ingredients, desserts, delivery, combos
//! - [`cart`] - The order being built
//! - [`combo`] - Slot assignment for combo pizzas
//! - [`order`] - Cart → stored record mapping, payments, TOTODO pricing
//! - [`stats`] - Daily caja aggregation
//! - [`ticket`] - Receipt, kitchen, caja and void tickets
//! - [`printer`] - Printer capability consumed by the register
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Shared value types
//! - [`error`] - Domain error types
//! - [`validation`] - Operator input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use pizzeria_core::cart::Cart;
//! use pizzeria_core::catalog::Catalog;
//! use pizzeria_core::money::Money;
//! use pizzeria_core::types::PizzaSize;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let mut cart = Cart::new(&catalog);
//!
//! let pepperoni = catalog.pizza("Pepperoni").unwrap();
//! cart.add_pizza(pepperoni, PizzaSize::Grande);
//! cart.add_pizza(pepperoni, PizzaSize::Grande);
//!
//! assert_eq!(cart.pizza_units(), 2);
//! assert_eq!(cart.total(), Money::from_units(300));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod combo;
pub mod error;
pub mod money;
pub mod order;
pub mod printer;
pub mod stats;
pub mod ticket;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLinePortion, LineId};
pub use catalog::Catalog;
pub use error::{ComboError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{NewOrder, PersistedOrder, TotodoPricing};
pub use stats::DailyStatistics;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Share of the order total a TOTODO customer pays (90%).
pub const TOTODO_PAYABLE_RATE: Percentage = Percentage::from_bps(9000);

/// Maximum quantity typed for a single line.
///
/// Stops a slip like 100 instead of 10 from reaching the cart.
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Maximum length of free-text fields (comments, descriptions).
pub const MAX_TEXT_LENGTH: usize = 200;
