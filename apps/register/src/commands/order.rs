//! # Order Commands
//!
//! Checkout and everything done to an order after it is stored.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout ──► to_persisted_order ──► orders.insert ──► cart cleared    │
//! │                    │ encode error                                       │
//! │                    └──► abort, nothing stored, cart untouched           │
//! │                                                                         │
//! │  record_payment ──► get_by_id ──► record_payment ──► update_payments   │
//! │  void_order     ──► get_by_id ──► soft_delete    ──► void ticket text  │
//! │  reprint        ──► get_by_id ──► receipt / kitchen ticket text        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::state::OrderSession;
use pizzeria_core::catalog::Catalog;
use pizzeria_core::order::to_persisted_order;
use pizzeria_core::ticket::{TicketFormatter, TicketOrder};
use pizzeria_core::validation::{
    parse_amount, validate_customer_name, validate_payment_amount, validate_phone,
};
use pizzeria_core::{CustomerSnapshot, Money, PaymentMethod, PersistedOrder};
use pizzeria_db::Database;

/// Which ticket a reprint produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Receipt,
    Kitchen,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub order_id: i64,
    pub amount_paid: Money,
    pub balance_due: Money,
    pub fully_paid: bool,
}

/// Builds a customer snapshot from what the operator typed.
pub fn customer_from_input(
    name: &str,
    phone: Option<&str>,
    address: Option<&str>,
) -> AppResult<CustomerSnapshot> {
    let phone = match phone {
        Some(p) => validate_phone(p)?,
        None => None,
    };
    let address = address
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    Ok(CustomerSnapshot {
        name: validate_customer_name(name)?,
        phone,
        address,
    })
}

/// Stores the session's cart as a new order.
///
/// On success the cart lines are cleared and delivery goes back to the
/// default; the comment stays until the caller clears it. On failure the
/// cart is left exactly as it was.
pub async fn checkout(
    db: &Database,
    session: &mut OrderSession,
    customer: &CustomerSnapshot,
    address: &str,
    now: DateTime<Utc>,
) -> AppResult<PersistedOrder> {
    debug!("checkout command");

    if session.cart().is_empty() {
        return Err(AppError::cart("Cart is empty"));
    }

    let order = to_persisted_order(session.cart(), customer, address, now)?;
    let id = db.orders().insert(&order).await?;

    let cart = session.cart_mut();
    cart.clear();
    cart.reset_delivery_option();

    info!(
        order_id = id,
        total = %order.total,
        totodo = order.totodo.is_totodo,
        "Order checked out"
    );

    Ok(PersistedOrder::new(id, order))
}

/// Records what was collected through one payment method.
///
/// `amount` is operator text; a second entry for the same method replaces
/// the first.
pub async fn record_payment(
    db: &Database,
    order_id: i64,
    method: PaymentMethod,
    amount: &str,
    reference: Option<String>,
) -> AppResult<PaymentResponse> {
    debug!(order_id, method = method.label(), amount = %amount, "record_payment command");

    let amount = parse_amount(amount)?;
    validate_payment_amount(amount)?;

    let mut stored = load_order(db, order_id).await?;
    if stored.order.is_deleted {
        return Err(AppError::business(format!(
            "Order {} is voided, cannot add payment",
            order_id
        )));
    }

    stored.order.record_payment(method, amount, reference)?;
    db.orders()
        .update_payments(order_id, &stored.order.payments)
        .await?;

    let response = PaymentResponse {
        order_id,
        amount_paid: stored.order.amount_paid(),
        balance_due: stored.order.balance_due(),
        fully_paid: stored.order.is_fully_paid(),
    };

    info!(
        order_id,
        method = method.label(),
        amount = %amount,
        balance_due = %response.balance_due,
        "Payment recorded"
    );

    Ok(response)
}

/// Soft-deletes an order and returns the void ticket to print.
pub async fn void_order(
    db: &Database,
    formatter: &TicketFormatter,
    order_id: i64,
    now: DateTime<Utc>,
) -> AppResult<String> {
    debug!(order_id, "void_order command");

    let mut stored = load_order(db, order_id).await?;
    if stored.order.is_deleted {
        return Err(AppError::business(format!(
            "Order {} is already voided",
            order_id
        )));
    }

    db.orders().soft_delete(order_id).await?;
    stored.order.soft_delete();

    info!(order_id, total = %stored.order.total, "Order voided");

    Ok(formatter.void_ticket(&TicketOrder::from_persisted(&stored), now))
}

/// Renders a stored order again. Voided orders can still be reprinted.
pub async fn reprint(
    db: &Database,
    formatter: &TicketFormatter,
    catalog: &Catalog,
    order_id: i64,
    kind: TicketKind,
) -> AppResult<String> {
    debug!(order_id, ?kind, "reprint command");

    let stored = load_order(db, order_id).await?;
    let view = TicketOrder::from_persisted(&stored);

    Ok(match kind {
        TicketKind::Receipt => formatter.customer_receipt(&view),
        TicketKind::Kitchen => formatter.kitchen_ticket(&view, catalog),
    })
}

async fn load_order(db: &Database, order_id: i64) -> AppResult<PersistedOrder> {
    db.orders()
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", order_id))
}
