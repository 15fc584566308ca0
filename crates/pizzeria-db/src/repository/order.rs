//! # Order Repository
//!
//! Database operations for order records.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CHECKOUT                                                           │
//! │     └── insert() → id assigned by SQLite                               │
//! │                                                                         │
//! │  2. CASH RECONCILIATION                                                │
//! │     └── update_payments() → payments column rewritten                  │
//! │                                                                         │
//! │  3. (OPTIONAL) EDIT                                                    │
//! │     └── update() → full field set rewritten                            │
//! │                                                                         │
//! │  4. (OPTIONAL) VOID                                                    │
//! │     └── soft_delete() → is_deleted = 1, row kept for audit             │
//! │                                                                         │
//! │  Rows are never physically deleted.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::from_millis;
use pizzeria_core::order::{NewOrder, PersistedOrder, TotodoPricing};
use pizzeria_core::stats::day_bounds;
use pizzeria_core::Money;

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, pizzas, desserts, total_cents, created_at_ms, customer,
        delivery_fee_cents, delivered, comment, address, payments,
        is_deleted, is_totodo, totodo_discounted_cents, totodo_discount_cents
    FROM orders
"#;

/// One row of the `orders` table.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    pizzas: String,
    desserts: String,
    total_cents: i64,
    created_at_ms: i64,
    customer: String,
    delivery_fee_cents: i64,
    delivered: bool,
    comment: String,
    address: String,
    payments: String,
    is_deleted: bool,
    is_totodo: bool,
    totodo_discounted_cents: i64,
    totodo_discount_cents: i64,
}

impl From<OrderRow> for PersistedOrder {
    fn from(row: OrderRow) -> Self {
        PersistedOrder::new(
            row.id,
            NewOrder {
                pizzas: row.pizzas,
                desserts: row.desserts,
                total: Money::from_cents(row.total_cents),
                created_at: from_millis(row.created_at_ms),
                customer: row.customer,
                delivery_fee: Money::from_cents(row.delivery_fee_cents),
                delivered: row.delivered,
                comment: row.comment,
                address: row.address,
                payments: row.payments,
                is_deleted: row.is_deleted,
                totodo: TotodoPricing {
                    is_totodo: row.is_totodo,
                    discounted_price: Money::from_cents(row.totodo_discounted_cents),
                    discount_amount: Money::from_cents(row.totodo_discount_cents),
                },
            },
        )
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and returns the id SQLite assigned.
    pub async fn insert(&self, order: &NewOrder) -> DbResult<i64> {
        debug!(total = %order.total, totodo = order.totodo.is_totodo, "Inserting order");

        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                pizzas, desserts, total_cents, created_at_ms, customer,
                delivery_fee_cents, delivered, comment, address, payments,
                is_deleted, is_totodo, totodo_discounted_cents, totodo_discount_cents
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14
            )
            "#,
        )
        .bind(&order.pizzas)
        .bind(&order.desserts)
        .bind(order.total.cents())
        .bind(order.created_at.timestamp_millis())
        .bind(&order.customer)
        .bind(order.delivery_fee.cents())
        .bind(order.delivered)
        .bind(&order.comment)
        .bind(&order.address)
        .bind(&order.payments)
        .bind(order.is_deleted)
        .bind(order.totodo.is_totodo)
        .bind(order.totodo.discounted_price.cents())
        .bind(order.totodo.discount_amount.cents())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Order inserted");
        Ok(id)
    }

    /// Gets an order by id, soft-deleted ones included.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<PersistedOrder>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PersistedOrder::from))
    }

    /// Orders created in `[day_start_ms, day_start_ms + 1 day)`, oldest
    /// first. Soft-deleted orders are excluded.
    pub async fn get_for_day(&self, day_start_ms: i64) -> DbResult<Vec<PersistedOrder>> {
        let (start, end) = day_bounds(day_start_ms);

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS}
             WHERE created_at_ms >= ?1 AND created_at_ms < ?2 AND is_deleted = 0
             ORDER BY created_at_ms, id"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(day_start_ms, count = rows.len(), "Loaded orders for day");
        Ok(rows.into_iter().map(PersistedOrder::from).collect())
    }

    /// Every order, soft-deleted ones included, oldest first.
    pub async fn get_all(&self) -> DbResult<Vec<PersistedOrder>> {
        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY created_at_ms, id"))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(PersistedOrder::from).collect())
    }

    /// Rewrites every field of a stored order.
    pub async fn update(&self, persisted: &PersistedOrder) -> DbResult<()> {
        let order = &persisted.order;
        debug!(id = persisted.id, "Updating order");

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                pizzas = ?2,
                desserts = ?3,
                total_cents = ?4,
                created_at_ms = ?5,
                customer = ?6,
                delivery_fee_cents = ?7,
                delivered = ?8,
                comment = ?9,
                address = ?10,
                payments = ?11,
                is_deleted = ?12,
                is_totodo = ?13,
                totodo_discounted_cents = ?14,
                totodo_discount_cents = ?15
            WHERE id = ?1
            "#,
        )
        .bind(persisted.id)
        .bind(&order.pizzas)
        .bind(&order.desserts)
        .bind(order.total.cents())
        .bind(order.created_at.timestamp_millis())
        .bind(&order.customer)
        .bind(order.delivery_fee.cents())
        .bind(order.delivered)
        .bind(&order.comment)
        .bind(&order.address)
        .bind(&order.payments)
        .bind(order.is_deleted)
        .bind(order.totodo.is_totodo)
        .bind(order.totodo.discounted_price.cents())
        .bind(order.totodo.discount_amount.cents())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", persisted.id));
        }

        Ok(())
    }

    /// Replaces the encoded payment breakdown of one order.
    pub async fn update_payments(&self, id: i64, payments: &str) -> DbResult<()> {
        debug!(id, "Updating order payments");

        let result = sqlx::query("UPDATE orders SET payments = ?2 WHERE id = ?1")
            .bind(id)
            .bind(payments)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Marks an order deleted. The row stays for audit reprints.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Soft-deleting order");

        let result = sqlx::query("UPDATE orders SET is_deleted = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
