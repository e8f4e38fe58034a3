use chrono::{DateTime, Utc};
use shared_types::AppError;
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// A single row from the `payment_orders` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentOrderRow {
    pub order_id: String,
    pub draft_id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub status: String,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

pub async fn insert_order(
    pool: &Pool<Postgres>,
    order_id: &str,
    draft_id: &str,
    amount: i64,
    currency: &str,
    receipt: &str,
) -> Result<PaymentOrderRow, AppError> {
    sqlx::query_as::<_, PaymentOrderRow>(
        "INSERT INTO payment_orders (order_id, draft_id, amount, currency, receipt) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING order_id, draft_id, amount, currency, receipt, status, payment_id, \
                   created_at, paid_at",
    )
    .bind(order_id)
    .bind(draft_id)
    .bind(amount)
    .bind(currency)
    .bind(receipt)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Outcome of payment reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub filing_number: String,
    pub draft_id: String,
    pub payment_id: String,
    pub amount: i64,
    /// True when this callback was a replay of an already-settled order
    /// and the recorded outcome was returned unchanged.
    pub replayed: bool,
}

/// Settle a verified payment callback.
///
/// Runs in one transaction with the order row locked, so concurrent
/// callbacks for the same order serialize: the first settles, the rest
/// see `paid` and get the recorded outcome back. The filing number is
/// issued exactly once per order.
pub async fn reconcile(
    pool: &Pool<Postgres>,
    order_id: &str,
    payment_id: &str,
    filing_number: &str,
) -> Result<Reconciled, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let order = sqlx::query_as::<_, PaymentOrderRow>(
        "SELECT order_id, draft_id, amount, currency, receipt, status, payment_id, \
                created_at, paid_at \
         FROM payment_orders WHERE order_id = $1 FOR UPDATE",
    )
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?
    .ok_or_else(|| AppError::not_found("Payment order not found"))?;

    if order.status == "paid" {
        let recorded: Option<Option<String>> =
            sqlx::query_scalar("SELECT filing_number FROM drafts WHERE draft_id = $1")
                .bind(&order.draft_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(SqlxErrorExt::into_app_error)?;
        let filing_number = recorded.flatten().ok_or_else(|| {
            AppError::internal("Settled order has no filing number on record")
        })?;
        tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
        return Ok(Reconciled {
            filing_number,
            draft_id: order.draft_id,
            payment_id: order.payment_id.unwrap_or_else(|| payment_id.to_string()),
            amount: order.amount,
            replayed: true,
        });
    }

    let updated = sqlx::query(
        "UPDATE drafts SET status = 'paid', filing_number = $2, payment_id = $3, \
            last_modified = NOW() \
         WHERE draft_id = $1 AND status = 'submitted'",
    )
    .bind(&order.draft_id)
    .bind(filing_number)
    .bind(payment_id)
    .execute(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    if updated.rows_affected() == 0 {
        return Err(AppError::conflict("Draft is not awaiting payment"));
    }

    sqlx::query(
        "UPDATE payment_orders SET status = 'paid', payment_id = $2, paid_at = NOW() \
         WHERE order_id = $1",
    )
    .bind(order_id)
    .bind(payment_id)
    .execute(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;

    Ok(Reconciled {
        filing_number: filing_number.to_string(),
        draft_id: order.draft_id,
        payment_id: payment_id.to_string(),
        amount: order.amount,
        replayed: false,
    })
}
