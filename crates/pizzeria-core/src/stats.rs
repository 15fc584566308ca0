//! # Daily Statistics Aggregator
//!
//! Recomputes the caja snapshot from one day's orders and manual cash
//! transactions. Nothing here is stored; every call starts from zero.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         compute()                                       │
//! │                                                                         │
//! │  orders ──► skip deleted ──► decode lines ──┬─► size buckets            │
//! │                                  │          ├─► dessert / extra         │
//! │                                  │          └─► delivery                │
//! │                                  ├─► total ──► cash register + orders   │
//! │                                  └─► payments ──► efectivo / transf.    │
//! │                                                                         │
//! │  transactions ──► INGRESO (+ register) / GASTO (− register)             │
//! │                                                                         │
//! │  cash_on_hand   = efectivo + income − expense                           │
//! │  unpaid_orders  = (efectivo + transferencia) − orders subtotal          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An order whose payloads cannot be read still adds its stored total to the
//! register; it just contributes no itemized units.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::order::{from_persisted_order, PersistedOrder};
use crate::types::{CashTransaction, PaymentMethod, SizeBucket, TransactionKind};

/// Milliseconds in one reporting day.
pub const DAY_MS: i64 = 86_400_000;

/// Half-open `[start, start + DAY_MS)` range for a day.
pub fn day_bounds(day_start_ms: i64) -> (i64, i64) {
    (day_start_ms, day_start_ms + DAY_MS)
}

// =============================================================================
// Snapshot
// =============================================================================

/// Units and revenue for one reporting bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BucketStats {
    pub units: u32,
    pub revenue: Money,
}

impl BucketStats {
    fn add(&mut self, units: u32, revenue: Money) {
        self.units += units;
        self.revenue += revenue;
    }
}

/// The caja snapshot for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyStatistics {
    pub pizzas_chica: BucketStats,
    pub pizzas_mediana: BucketStats,
    pub pizzas_grande: BucketStats,
    /// All pizza lines, including labels outside the three buckets.
    pub pizzas_total: BucketStats,
    pub desserts: BucketStats,
    pub extras: BucketStats,
    /// `units` counts delivered orders; `revenue` sums their fees.
    pub delivery: BucketStats,
    pub order_count: u32,
    /// Order totals plus income minus expenses.
    pub cash_register_total: Money,
    /// Order totals only.
    pub orders_subtotal: Money,
    pub cash_received_efectivo: Money,
    pub cash_received_transferencia: Money,
    pub captured_income: Money,
    pub captured_expense: Money,
    pub cash_on_hand: Money,
    /// Collected minus nominal order totals, unclamped. Positive when more
    /// was collected than the orders add up to.
    pub unpaid_orders_amount: Money,
    pub totodo_orders: u32,
    pub totodo_discount_total: Money,
}

impl DailyStatistics {
    fn bucket_mut(&mut self, bucket: SizeBucket) -> &mut BucketStats {
        match bucket {
            SizeBucket::Chica => &mut self.pizzas_chica,
            SizeBucket::Mediana => &mut self.pizzas_mediana,
            SizeBucket::Grande => &mut self.pizzas_grande,
        }
    }

    pub fn bucket(&self, bucket: SizeBucket) -> BucketStats {
        match bucket {
            SizeBucket::Chica => self.pizzas_chica,
            SizeBucket::Mediana => self.pizzas_mediana,
            SizeBucket::Grande => self.pizzas_grande,
        }
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds the day's snapshot.
///
/// Callers pass the orders and transactions already loaded for the day;
/// deleted orders are skipped here as well.
pub fn compute(orders: &[PersistedOrder], transactions: &[CashTransaction]) -> DailyStatistics {
    let mut stats = DailyStatistics::default();

    for persisted in orders.iter().filter(|o| !o.order.is_deleted) {
        let order = &persisted.order;
        stats.order_count += 1;

        let lines = from_persisted_order(order);
        for line in &lines.pizzas {
            let subtotal = line.subtotal();
            if let Some(bucket) = SizeBucket::classify(&line.size) {
                stats.bucket_mut(bucket).add(line.quantity, subtotal);
            }
            stats.pizzas_total.add(line.quantity, subtotal);
        }

        for line in &lines.desserts {
            let target = if line.is_dessert {
                &mut stats.desserts
            } else {
                &mut stats.extras
            };
            target.add(line.quantity, line.subtotal());
        }

        if order.delivered {
            stats.delivery.add(1, order.delivery_fee);
        }

        if order.totodo.is_totodo {
            stats.totodo_orders += 1;
            stats.totodo_discount_total += order.totodo.discount_amount;
        }

        stats.cash_register_total += order.total;
        stats.orders_subtotal += order.total;

        for payment in order.payments() {
            match payment.method {
                PaymentMethod::Efectivo => stats.cash_received_efectivo += payment.amount,
                PaymentMethod::Transferencia => {
                    stats.cash_received_transferencia += payment.amount
                }
            }
        }
    }

    for tx in transactions {
        match tx.kind {
            TransactionKind::Ingreso => {
                stats.captured_income += tx.amount;
                stats.cash_register_total += tx.amount;
            }
            TransactionKind::Gasto => {
                stats.captured_expense += tx.amount;
                stats.cash_register_total -= tx.amount;
            }
        }
    }

    stats.cash_on_hand =
        stats.cash_received_efectivo + stats.captured_income - stats.captured_expense;
    stats.unpaid_orders_amount = stats.cash_received_efectivo + stats.cash_received_transferencia
        - stats.orders_subtotal;

    stats
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{encode_payload, NewOrder, StoredDessertLine, StoredPizzaLine, TotodoPricing};
    use crate::order::tests::at;
    use chrono::Utc;

    fn pizza(size: &str, unit_price: i64, quantity: u32) -> StoredPizzaLine {
        StoredPizzaLine {
            name: Some("Pepperoni".to_string()),
            size: size.to_string(),
            unit_price: Money::from_units(unit_price),
            quantity,
            golden: false,
            portions: Vec::new(),
        }
    }

    fn order(id: i64, pizzas: &[StoredPizzaLine], total: i64) -> PersistedOrder {
        PersistedOrder::new(
            id,
            NewOrder {
                pizzas: encode_payload(pizzas).unwrap(),
                desserts: encode_payload::<StoredDessertLine>(&[]).unwrap(),
                total: Money::from_units(total),
                created_at: at(19),
                customer: "{}".to_string(),
                delivery_fee: Money::zero(),
                delivered: false,
                comment: String::new(),
                address: String::new(),
                payments: encode_payload::<crate::types::PaymentEntry>(&[]).unwrap(),
                is_deleted: false,
                totodo: TotodoPricing::default(),
            },
        )
    }

    fn tx(kind: TransactionKind, units: i64) -> CashTransaction {
        CashTransaction {
            id: 1,
            kind,
            amount: Money::from_units(units),
            description: "movimiento".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        assert_eq!(compute(&[], &[]), DailyStatistics::default());
    }

    #[test]
    fn test_delivered_paid_order_and_deleted_order() {
        // A: grande $150 + $30 delivery, paid in cash
        let mut a = order(1, &[pizza("Grande", 150, 1)], 150);
        a.order.delivered = true;
        a.order.delivery_fee = Money::from_units(30);
        a.order
            .record_payment(PaymentMethod::Efectivo, Money::from_units(150), None)
            .unwrap();

        // B: chica $80, voided
        let mut b = order(2, &[pizza("Chica", 80, 1)], 80);
        b.order.soft_delete();

        let stats = compute(&[a, b], &[]);

        assert_eq!(stats.pizzas_grande.units, 1);
        assert_eq!(stats.pizzas_grande.revenue, Money::from_units(150));
        assert_eq!(stats.pizzas_chica, BucketStats::default());
        assert_eq!(stats.delivery.units, 1);
        assert_eq!(stats.delivery.revenue, Money::from_units(30));
        assert_eq!(stats.cash_register_total, Money::from_units(150));
        assert_eq!(stats.cash_received_efectivo, Money::from_units(150));
        assert_eq!(stats.order_count, 1);
        assert!(stats.unpaid_orders_amount.is_zero());
    }

    #[test]
    fn test_malformed_payload_still_counts_total() {
        let mut broken = order(1, &[], 200);
        broken.order.pizzas = "not json at all".to_string();
        broken.order.payments = "{".to_string();

        let stats = compute(&[broken], &[]);

        assert_eq!(stats.cash_register_total, Money::from_units(200));
        assert_eq!(stats.orders_subtotal, Money::from_units(200));
        assert_eq!(stats.pizzas_chica.units, 0);
        assert_eq!(stats.pizzas_mediana.units, 0);
        assert_eq!(stats.pizzas_grande.units, 0);
        assert_eq!(stats.pizzas_total.units, 0);
        assert_eq!(stats.unpaid_orders_amount, Money::from_units(-200));
    }

    #[test]
    fn test_size_label_substring_buckets() {
        let o = order(
            1,
            &[
                pizza("Extra Grande", 190, 1),
                pizza("GRANDE", 150, 2),
                pizza("mediana", 120, 1),
                pizza("Chica", 90, 3),
                pizza("Familiar", 100, 1),
            ],
            1000,
        );

        let stats = compute(&[o], &[]);

        assert_eq!(stats.pizzas_grande.units, 3);
        assert_eq!(stats.pizzas_grande.revenue, Money::from_units(490));
        assert_eq!(stats.pizzas_mediana.units, 1);
        assert_eq!(stats.pizzas_chica.units, 3);
        assert_eq!(stats.pizzas_chica.revenue, Money::from_units(270));
        // unmatched label only shows in totals
        assert_eq!(stats.pizzas_total.units, 8);
        assert_eq!(stats.pizzas_total.revenue, Money::from_units(1000));
    }

    #[test]
    fn test_desserts_and_extras_split_on_flag() {
        let mut o = order(1, &[], 140);
        o.order.desserts = encode_payload(&[
            StoredDessertLine {
                item_id: 1,
                name: "Flan".to_string(),
                price: Money::from_units(45),
                is_dessert: true,
                quantity: 2,
            },
            StoredDessertLine {
                item_id: 3,
                name: "Refresco".to_string(),
                price: Money::from_units(25),
                is_dessert: false,
                quantity: 2,
            },
        ])
        .unwrap();

        let stats = compute(&[o], &[]);

        assert_eq!(stats.desserts.units, 2);
        assert_eq!(stats.desserts.revenue, Money::from_units(90));
        assert_eq!(stats.extras.units, 2);
        assert_eq!(stats.extras.revenue, Money::from_units(50));
    }

    #[test]
    fn test_transactions_reconcile_cash() {
        let mut o = order(1, &[pizza("Grande", 150, 1)], 150);
        o.order
            .record_payment(PaymentMethod::Efectivo, Money::from_units(100), None)
            .unwrap();
        o.order
            .record_payment(PaymentMethod::Transferencia, Money::from_units(80), None)
            .unwrap();

        let stats = compute(
            &[o],
            &[tx(TransactionKind::Ingreso, 500), tx(TransactionKind::Gasto, 120)],
        );

        assert_eq!(stats.captured_income, Money::from_units(500));
        assert_eq!(stats.captured_expense, Money::from_units(120));
        assert_eq!(stats.cash_register_total, Money::from_units(150 + 500 - 120));
        assert_eq!(stats.orders_subtotal, Money::from_units(150));
        assert_eq!(stats.cash_on_hand, Money::from_units(100 + 500 - 120));
        // over-collected by 30, kept signed
        assert_eq!(stats.unpaid_orders_amount, Money::from_units(30));
    }

    #[test]
    fn test_totodo_orders_are_tallied() {
        let mut o = order(1, &[pizza("Grande", 150, 1)], 150);
        o.order.totodo = TotodoPricing::for_total(Money::from_units(150));

        let stats = compute(&[o], &[]);

        assert_eq!(stats.totodo_orders, 1);
        assert_eq!(stats.totodo_discount_total, Money::from_units(15));
        assert_eq!(stats.cash_register_total, Money::from_units(150));
    }

    #[test]
    fn test_day_bounds() {
        assert_eq!(day_bounds(1_000), (1_000, 1_000 + DAY_MS));
    }
}
