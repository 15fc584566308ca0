//! # Order Persistence Mapper
//!
//! Converts a finished cart into the flat order record handed to storage,
//! and reads the nested payloads of stored records back for reporting and
//! reprinting.
//!
//! ## Record Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Record                                     │
//! │                                                                         │
//! │  Scalar columns                 JSON payload columns                    │
//! │  ──────────────                 ────────────────────                    │
//! │  total          (fixed)         pizzas    {"version":1,"items":[...]}   │
//! │  created_at                     desserts  {"version":1,"items":[...]}   │
//! │  delivery_fee / delivered       payments  {"version":1,"items":[...]}   │
//! │  comment / address              customer  {"name":..,"phone":..}        │
//! │  is_deleted                                                             │
//! │  totodo (is/discounted/discount)                                        │
//! │                                                                         │
//! │  Decoding never fails: unreadable payloads become empty lists and       │
//! │  are logged at WARN. The scalar total stays the revenue source.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line snapshots freeze names, size labels, prices and the dessert flag at
//! checkout so old orders never depend on today's catalog.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::cart::{Cart, CartDessertLine, CartLineItem, CartLinePortion, PizzaLineKind};
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{CustomerSnapshot, PaymentEntry, PaymentMethod, Percentage};
use crate::TOTODO_PAYABLE_RATE;

/// Current version written into payload envelopes.
pub const PAYLOAD_VERSION: u32 = 1;

// =============================================================================
// Stored Line Snapshots
// =============================================================================

/// A pizza line as frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPizzaLine {
    /// Catalog pizza name; `None` for combo lines.
    #[serde(default)]
    pub name: Option<String>,
    /// Size label, e.g. "Extra Grande".
    pub size: String,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default)]
    pub golden: bool,
    /// Combo portions in slot order; empty for simple lines.
    #[serde(default)]
    pub portions: Vec<CartLinePortion>,
}

impl StoredPizzaLine {
    pub fn subtotal(&self) -> Money {
        self.unit_price * self.quantity
    }

    pub fn is_combo(&self) -> bool {
        !self.portions.is_empty()
    }
}

impl From<&CartLineItem> for StoredPizzaLine {
    fn from(line: &CartLineItem) -> Self {
        let (name, portions) = match line.kind() {
            PizzaLineKind::Simple { pizza, .. } => (Some(pizza.clone()), Vec::new()),
            PizzaLineKind::Combo { portions, .. } => (None, portions.clone()),
        };
        StoredPizzaLine {
            name,
            size: line.size().label().to_string(),
            unit_price: line.unit_price(),
            quantity: line.quantity(),
            golden: line.is_golden(),
            portions,
        }
    }
}

/// A dessert/extra line as frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDessertLine {
    pub item_id: u32,
    pub name: String,
    pub price: Money,
    /// Drives the dessert vs extra bucket in the caja report.
    pub is_dessert: bool,
    pub quantity: u32,
}

impl StoredDessertLine {
    pub fn subtotal(&self) -> Money {
        self.price * self.quantity
    }
}

impl From<&CartDessertLine> for StoredDessertLine {
    fn from(line: &CartDessertLine) -> Self {
        StoredDessertLine {
            item_id: line.item().id,
            name: line.item().name.clone(),
            price: line.item().price,
            is_dessert: line.item().is_dessert,
            quantity: line.quantity(),
        }
    }
}

/// Line items decoded from a stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLines {
    pub pizzas: Vec<StoredPizzaLine>,
    pub desserts: Vec<StoredDessertLine>,
}

// =============================================================================
// TOTODO Pricing
// =============================================================================

/// Discount fields carried by TOTODO orders. All zero otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotodoPricing {
    pub is_totodo: bool,
    pub discounted_price: Money,
    pub discount_amount: Money,
}

impl TotodoPricing {
    /// Applies the channel's payable rate to `total`, rounding half-up to a
    /// whole unit.
    ///
    /// ```rust
    /// use pizzeria_core::money::Money;
    /// use pizzeria_core::order::TotodoPricing;
    ///
    /// let pricing = TotodoPricing::for_total(Money::from_units(101));
    /// assert_eq!(pricing.discounted_price, Money::from_units(91));
    /// assert_eq!(pricing.discount_amount, Money::from_units(10));
    /// ```
    pub fn for_total(total: Money) -> Self {
        Self::with_rate(total, TOTODO_PAYABLE_RATE)
    }

    fn with_rate(total: Money, payable: Percentage) -> Self {
        let discounted_price = total.percent_rounded_to_unit(payable);
        TotodoPricing {
            is_totodo: true,
            discounted_price,
            discount_amount: total - discounted_price,
        }
    }
}

// =============================================================================
// Order Records
// =============================================================================

/// An order record before storage assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Encoded `StoredPizzaLine` list.
    pub pizzas: String,
    /// Encoded `StoredDessertLine` list.
    pub desserts: String,
    /// Fixed at checkout; never recomputed from the payloads.
    pub total: Money,
    pub created_at: DateTime<Utc>,
    /// Encoded `CustomerSnapshot`.
    pub customer: String,
    pub delivery_fee: Money,
    pub delivered: bool,
    pub comment: String,
    pub address: String,
    /// Encoded `PaymentEntry` list.
    pub payments: String,
    pub is_deleted: bool,
    pub totodo: TotodoPricing,
}

/// An order record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedOrder {
    pub id: i64,
    pub order: NewOrder,
}

impl PersistedOrder {
    pub fn new(id: i64, order: NewOrder) -> Self {
        PersistedOrder { id, order }
    }
}

/// Maps a finished cart into an order record.
///
/// Fails only if a payload cannot be encoded, in which case nothing should be
/// sent to storage.
pub fn to_persisted_order(
    cart: &Cart,
    customer: &CustomerSnapshot,
    delivery_address: &str,
    timestamp: DateTime<Utc>,
) -> CoreResult<NewOrder> {
    let pizzas: Vec<StoredPizzaLine> = cart.pizza_lines().iter().map(StoredPizzaLine::from).collect();
    let desserts: Vec<StoredDessertLine> = cart
        .dessert_lines()
        .iter()
        .map(StoredDessertLine::from)
        .collect();

    let delivery = cart.delivery_option();
    let total = cart.total();
    let totodo = if delivery.is_totodo() {
        TotodoPricing::for_total(total)
    } else {
        TotodoPricing::default()
    };

    Ok(NewOrder {
        pizzas: encode_payload(&pizzas)?,
        desserts: encode_payload(&desserts)?,
        total,
        created_at: timestamp,
        customer: serde_json::to_string(customer)?,
        delivery_fee: delivery.price,
        delivered: delivery.price.is_positive(),
        comment: cart.comment().to_string(),
        address: delivery_address.to_string(),
        payments: encode_payload::<PaymentEntry>(&[])?,
        is_deleted: false,
        totodo,
    })
}

/// Decodes the line payloads of a stored order. Never fails.
pub fn from_persisted_order(order: &NewOrder) -> OrderLines {
    OrderLines {
        pizzas: decode_payload(&order.pizzas, "pizzas"),
        desserts: decode_payload(&order.desserts, "desserts"),
    }
}

impl NewOrder {
    /// Decoded payment breakdown; empty when unreadable.
    pub fn payments(&self) -> Vec<PaymentEntry> {
        decode_payload(&self.payments, "payments")
    }

    /// Decoded customer snapshot; blank when unreadable.
    pub fn customer_snapshot(&self) -> CustomerSnapshot {
        match serde_json::from_str(&self.customer) {
            Ok(customer) => customer,
            Err(e) => {
                warn!(error = %e, "Unreadable customer payload, using blank customer");
                CustomerSnapshot::default()
            }
        }
    }

    /// Sets the amount collected through `method`, replacing any previous
    /// entry for that method.
    pub fn record_payment(
        &mut self,
        method: PaymentMethod,
        amount: Money,
        reference: Option<String>,
    ) -> CoreResult<()> {
        let mut payments = self.payments();
        let entry = PaymentEntry {
            method,
            amount,
            reference,
        };
        match payments.iter_mut().find(|p| p.method == method) {
            Some(existing) => *existing = entry,
            None => payments.push(entry),
        }
        self.payments = encode_payload(&payments)?;
        Ok(())
    }

    /// Sum of the payment breakdown.
    pub fn amount_paid(&self) -> Money {
        self.payments().iter().map(|p| p.amount).sum()
    }

    /// What is still owed against the nominal total. Negative when
    /// over-collected.
    pub fn balance_due(&self) -> Money {
        self.total - self.amount_paid()
    }

    pub fn is_fully_paid(&self) -> bool {
        self.amount_paid() >= self.total
    }

    /// Marks the order voided. The record itself is kept.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Amount the customer is charged: the discounted price on TOTODO
    /// orders, the total otherwise.
    pub fn amount_charged(&self) -> Money {
        if self.totodo.is_totodo {
            self.totodo.discounted_price
        } else {
            self.total
        }
    }
}

// =============================================================================
// Payload Envelope
// =============================================================================

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    items: Vec<T>,
}

/// Encodes a list into the versioned envelope.
pub fn encode_payload<T: Serialize>(items: &[T]) -> CoreResult<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: PAYLOAD_VERSION,
        items,
    })?)
}

/// Decodes a list payload, accepting the envelope or a bare array.
///
/// Anything else yields an empty list and a warning naming `what`.
pub fn decode_payload<T: DeserializeOwned>(raw: &str, what: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Envelope<T>>(raw) {
        Ok(envelope) => {
            if envelope.version > PAYLOAD_VERSION {
                warn!(
                    payload = what,
                    version = envelope.version,
                    "Payload written by a newer version"
                );
            }
            return envelope.items;
        }
        Err(envelope_err) => {
            if let Ok(items) = serde_json::from_str::<Vec<T>>(raw) {
                return items;
            }
            warn!(payload = what, error = %envelope_err, "Unreadable payload, using empty list");
        }
    }

    Vec::new()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{PizzaFraction, PizzaSize};
    use chrono::TimeZone;

    pub(crate) fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, hour, 0, 0).unwrap()
    }

    fn customer() -> CustomerSnapshot {
        CustomerSnapshot {
            name: "Ana".to_string(),
            phone: Some("5551234567".to_string()),
            address: None,
        }
    }

    fn sample_cart(catalog: &Catalog) -> Cart {
        let mut cart = Cart::new(catalog);
        cart.add_pizza(catalog.pizza("Pepperoni").unwrap(), PizzaSize::Grande);
        cart.add_combo_line(
            catalog,
            PizzaSize::Mediana,
            vec![
                CartLinePortion {
                    pizza: "Hawaiana".to_string(),
                    fraction: PizzaFraction::Half,
                },
                CartLinePortion {
                    pizza: "Margarita".to_string(),
                    fraction: PizzaFraction::Half,
                },
            ],
        );
        cart.add_dessert(catalog.dessert(1).unwrap());
        cart.set_comment("tocar timbre");
        cart
    }

    #[test]
    fn test_to_persisted_order_snapshots_cart() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = sample_cart(&catalog);
        cart.set_delivery_option(catalog.list_delivery_options()[2].clone());

        let order = to_persisted_order(&cart, &customer(), "Calle 5 #10", at(20)).unwrap();

        assert_eq!(order.total, Money::from_units(150 + 130 + 45 + 30));
        assert_eq!(order.delivery_fee, Money::from_units(30));
        assert!(order.delivered);
        assert_eq!(order.comment, "tocar timbre");
        assert_eq!(order.address, "Calle 5 #10");
        assert!(!order.is_deleted);
        assert_eq!(order.totodo, TotodoPricing::default());
        assert!(order.payments().is_empty());
        assert_eq!(order.customer_snapshot(), customer());

        let lines = from_persisted_order(&order);
        assert_eq!(lines.pizzas.len(), 2);
        assert_eq!(lines.pizzas[0].name.as_deref(), Some("Pepperoni"));
        assert_eq!(lines.pizzas[0].size, "Grande");
        assert!(lines.pizzas[1].is_combo());
        assert_eq!(lines.pizzas[1].portions[0].pizza, "Hawaiana");
        assert_eq!(lines.desserts[0].name, "Flan napolitano");
        assert!(lines.desserts[0].is_dessert);
    }

    #[test]
    fn test_pickup_is_not_delivered() {
        let catalog = Catalog::builtin().unwrap();
        let cart = sample_cart(&catalog);
        let order = to_persisted_order(&cart, &customer(), "", at(12)).unwrap();
        assert!(!order.delivered);
        assert!(order.delivery_fee.is_zero());
    }

    #[test]
    fn test_totodo_rounding_examples() {
        let cases = [(100, 90, 10), (99, 89, 10), (101, 91, 10)];
        for (total, discounted, discount) in cases {
            let pricing = TotodoPricing::for_total(Money::from_units(total));
            assert!(pricing.is_totodo);
            assert_eq!(pricing.discounted_price, Money::from_units(discounted));
            assert_eq!(pricing.discount_amount, Money::from_units(discount));
        }
    }

    #[test]
    fn test_totodo_order_carries_discount() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new(&catalog);
        cart.add_pizza(catalog.pizza("Pepperoni").unwrap(), PizzaSize::Grande);
        cart.set_delivery_option(catalog.list_delivery_options()[4].clone());

        let order = to_persisted_order(&cart, &customer(), "", at(21)).unwrap();

        assert_eq!(order.total, Money::from_units(150));
        assert!(order.totodo.is_totodo);
        assert_eq!(order.totodo.discounted_price, Money::from_units(135));
        assert_eq!(order.totodo.discount_amount, Money::from_units(15));
        assert_eq!(order.amount_charged(), Money::from_units(135));
    }

    #[test]
    fn test_record_payment_overwrites_same_method() {
        let catalog = Catalog::builtin().unwrap();
        let mut order = to_persisted_order(&sample_cart(&catalog), &customer(), "", at(13)).unwrap();

        order
            .record_payment(PaymentMethod::Efectivo, Money::from_units(50), None)
            .unwrap();
        order
            .record_payment(PaymentMethod::Efectivo, Money::from_units(70), None)
            .unwrap();

        let payments = order.payments();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].method, PaymentMethod::Efectivo);
        assert_eq!(payments[0].amount, Money::from_units(70));
    }

    #[test]
    fn test_fully_paid_across_methods() {
        let catalog = Catalog::builtin().unwrap();
        let mut order = to_persisted_order(&sample_cart(&catalog), &customer(), "", at(13)).unwrap();
        assert_eq!(order.total, Money::from_units(325));
        assert!(!order.is_fully_paid());

        order
            .record_payment(PaymentMethod::Efectivo, Money::from_units(200), None)
            .unwrap();
        assert_eq!(order.balance_due(), Money::from_units(125));

        order
            .record_payment(
                PaymentMethod::Transferencia,
                Money::from_units(125),
                Some("SPEI 8812".to_string()),
            )
            .unwrap();
        assert!(order.is_fully_paid());
        assert!(order.balance_due().is_zero());
        assert_eq!(order.payments().len(), 2);
    }

    #[test]
    fn test_soft_delete_flips_flag_only() {
        let catalog = Catalog::builtin().unwrap();
        let mut order = to_persisted_order(&sample_cart(&catalog), &customer(), "", at(13)).unwrap();
        let before = order.clone();

        order.soft_delete();

        assert!(order.is_deleted);
        assert_eq!(order.total, before.total);
        assert_eq!(order.pizzas, before.pizzas);
    }

    #[test]
    fn test_malformed_payloads_recover_as_empty() {
        let catalog = Catalog::builtin().unwrap();
        let mut order = to_persisted_order(&sample_cart(&catalog), &customer(), "", at(13)).unwrap();
        order.pizzas = "{not json".to_string();
        order.desserts = r#"{"version":1,"items":"nope"}"#.to_string();
        order.payments = "42".to_string();
        order.customer = "[]".to_string();

        let lines = from_persisted_order(&order);
        assert!(lines.pizzas.is_empty());
        assert!(lines.desserts.is_empty());
        assert!(order.payments().is_empty());
        assert_eq!(order.customer_snapshot(), CustomerSnapshot::default());
        assert!(order.amount_paid().is_zero());
    }

    #[test]
    fn test_bare_array_payload_still_decodes() {
        let raw = r#"[{"item_id":3,"name":"Refresco 600ml","price":2500,"is_dessert":false,"quantity":2}]"#;
        let lines: Vec<StoredDessertLine> = decode_payload(raw, "desserts");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].subtotal(), Money::from_units(50));
    }

    #[test]
    fn test_envelope_shape() {
        let encoded = encode_payload(&[PaymentEntry {
            method: PaymentMethod::Transferencia,
            amount: Money::from_units(10),
            reference: None,
        }])
        .unwrap();
        assert_eq!(
            encoded,
            r#"{"version":1,"items":[{"method":"TRANSFERENCIA","amount":1000}]}"#
        );
    }
}
