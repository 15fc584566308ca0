//! # Caja Commands
//!
//! Daily cash-register summary and manual income/expense entries.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use pizzeria_core::stats::{self, DailyStatistics};
use pizzeria_core::validation::{parse_amount, validate_description, validate_payment_amount};
use pizzeria_core::{CashTransaction, NewCashTransaction, TransactionKind};
use pizzeria_db::Database;

/// Epoch milliseconds of local midnight starting `date` at `offset`.
pub fn day_start_ms(date: NaiveDate, offset: FixedOffset) -> AppResult<i64> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .ok_or_else(|| AppError::validation(format!("Invalid day: {}", date)))?;
    Ok(midnight.timestamp_millis())
}

/// The local calendar day containing `now`.
pub fn local_today(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Loads the day's orders and transactions and aggregates them.
pub async fn daily_summary(db: &Database, day_start_ms: i64) -> AppResult<DailyStatistics> {
    debug!(day_start_ms, "daily_summary command");

    let orders = db.orders().get_for_day(day_start_ms).await?;
    let transactions = db.transactions().get_for_day(day_start_ms).await?;
    let summary = stats::compute(&orders, &transactions);

    info!(
        day_start_ms,
        orders = summary.order_count,
        total = %summary.cash_register_total,
        "Daily summary computed"
    );

    Ok(summary)
}

/// Records a manual income or expense typed on the caja screen.
pub async fn add_transaction(
    db: &Database,
    kind: TransactionKind,
    amount: &str,
    description: &str,
    now: DateTime<Utc>,
) -> AppResult<CashTransaction> {
    debug!(kind = kind.as_str(), amount = %amount, "add_transaction command");

    let amount = parse_amount(amount)?;
    validate_payment_amount(amount)?;
    let description = validate_description(description)?;

    let stored = db
        .transactions()
        .insert(&NewCashTransaction {
            kind,
            amount,
            description,
            created_at: now,
        })
        .await?;

    info!(id = stored.id, kind = kind.as_str(), amount = %amount, "Cash transaction recorded");
    Ok(stored)
}

/// Removes a manual entry typed by mistake.
pub async fn delete_transaction(db: &Database, id: i64) -> AppResult<()> {
    debug!(id, "delete_transaction command");

    db.transactions().delete(id).await?;

    info!(id, "Cash transaction deleted");
    Ok(())
}
