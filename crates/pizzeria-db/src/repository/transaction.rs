//! # Cash Transaction Repository
//!
//! Manual income and expense entries captured during the day. Unlike orders
//! these are hard-deleted: an entry typed by mistake simply disappears from
//! the cash report.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::from_millis;
use pizzeria_core::stats::day_bounds;
use pizzeria_core::types::{CashTransaction, NewCashTransaction, TransactionKind};
use pizzeria_core::Money;

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    kind: TransactionKind,
    amount_cents: i64,
    description: String,
    created_at_ms: i64,
}

impl From<TransactionRow> for CashTransaction {
    fn from(row: TransactionRow) -> Self {
        CashTransaction {
            id: row.id,
            kind: row.kind,
            amount: Money::from_cents(row.amount_cents),
            description: row.description,
            created_at: from_millis(row.created_at_ms),
        }
    }
}

/// Repository for manual cash transactions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Stores a transaction and returns it with its assigned id.
    pub async fn insert(&self, tx: &NewCashTransaction) -> DbResult<CashTransaction> {
        debug!(kind = tx.kind.as_str(), amount = %tx.amount, "Inserting cash transaction");

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (kind, amount_cents, description, created_at_ms)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(tx.kind)
        .bind(tx.amount.cents())
        .bind(&tx.description)
        .bind(tx.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(CashTransaction {
            id: result.last_insert_rowid(),
            kind: tx.kind,
            amount: tx.amount,
            description: tx.description.clone(),
            created_at: tx.created_at,
        })
    }

    /// Transactions created in `[day_start_ms, day_start_ms + 1 day)`,
    /// oldest first.
    pub async fn get_for_day(&self, day_start_ms: i64) -> DbResult<Vec<CashTransaction>> {
        let (start, end) = day_bounds(day_start_ms);

        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, kind, amount_cents, description, created_at_ms
            FROM transactions
            WHERE created_at_ms >= ?1 AND created_at_ms < ?2
            ORDER BY created_at_ms, id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CashTransaction::from).collect())
    }

    /// Removes a transaction.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting cash transaction");

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        Ok(())
    }
}
