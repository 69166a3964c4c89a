//! PostgreSQL implementation of TransitionStore.
//!
//! One transaction per webhook event. Lock order is fixed (payment row,
//! then its order row) so concurrent deliveries for the same order cannot
//! deadlock. The event row is inserted only after the pure decision says
//! the event is safe to act on; its unique event id is the deduplication
//! mechanism, and a duplicate insert is treated as "already processed".

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{CustomerId, OrderId, PaymentId};
use crate::domain::payment::webhook_errors::WebhookError;
use crate::domain::payment::{
    decide, OrderPaymentStatus, OrderRecord, OrderStatus, PaymentRecord, ReconciledEvent,
    TotalsSnapshot, TransitionDecision,
};
use crate::ports::{TransitionOutcome, TransitionStore};

use super::payment_repository::PaymentRow;

/// PostgreSQL implementation of the TransitionStore port.
pub struct PostgresTransitionStore {
    pool: PgPool,
}

impl PostgresTransitionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderLockRow {
    id: Uuid,
    customer_id: Uuid,
    status: String,
    payment_status: String,
    totals_snapshot: Option<serde_json::Value>,
    is_snapshot_locked: bool,
    payment_method: Option<String>,
    payment_transaction_id: Option<String>,
}

impl From<OrderLockRow> for OrderRecord {
    fn from(row: OrderLockRow) -> Self {
        OrderRecord {
            id: OrderId::from_uuid(row.id),
            customer_id: CustomerId::from_uuid(row.customer_id),
            status: OrderStatus::normalize(&row.status),
            payment_status: OrderPaymentStatus::normalize(&row.payment_status),
            totals_snapshot: row
                .totals_snapshot
                .and_then(|v| serde_json::from_value::<TotalsSnapshot>(v).ok()),
            snapshot_locked: row.is_snapshot_locked,
            payment_method: row.payment_method,
            payment_transaction_id: row.payment_transaction_id,
        }
    }
}

fn db_err(e: sqlx::Error) -> WebhookError {
    WebhookError::Database(e.to_string())
}

fn is_duplicate_event(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return db_err.constraint() == Some("webhook_events_event_id_key");
    }
    false
}

/// Inserts the event row. Returns the row id, or `None` when the unique
/// event id already exists (another delivery committed first).
async fn record_event(
    tx: &mut Transaction<'_, Postgres>,
    provider: &str,
    event: &ReconciledEvent,
) -> Result<Option<Uuid>, WebhookError> {
    let row_id = Uuid::new_v4();
    let result = sqlx::query(
        r#"
        INSERT INTO webhook_events (id, provider, event_id, event_type, intent_id, created_at)
        VALUES ($1, $2, $3, $4, $5, now())
        "#,
    )
    .bind(row_id)
    .bind(provider)
    .bind(&event.event_id)
    .bind(event.kind.as_str())
    .bind(&event.intent_id)
    .execute(&mut **tx)
    .await;

    match result {
        Ok(_) => Ok(Some(row_id)),
        Err(e) if is_duplicate_event(&e) => Ok(None),
        Err(e) => Err(db_err(e)),
    }
}

async fn finalize_event(
    tx: &mut Transaction<'_, Postgres>,
    event_row_id: Uuid,
    order_id: &OrderId,
) -> Result<(), WebhookError> {
    sqlx::query("UPDATE webhook_events SET processed_at = now(), order_id = $2 WHERE id = $1")
        .bind(event_row_id)
        .bind(order_id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn append_history(
    tx: &mut Transaction<'_, Postgres>,
    order_id: &OrderId,
    status: OrderStatus,
) -> Result<(), WebhookError> {
    sqlx::query(
        "INSERT INTO order_status_history (id, order_id, status, created_at) VALUES ($1, $2, $3, now())",
    )
    .bind(Uuid::new_v4())
    .bind(order_id.as_uuid())
    .bind(status.as_str())
    .execute(&mut **tx)
    .await
    .map_err(db_err)?;
    Ok(())
}

#[async_trait]
impl TransitionStore for PostgresTransitionStore {
    async fn apply(
        &self,
        payment_id: &PaymentId,
        event: &ReconciledEvent,
    ) -> Result<TransitionOutcome, WebhookError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // 1. Lock the payment row, then its order row, in that order
        let payment_row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, order_id, provider, provider_intent_id, checkout_attempt_key,
                   amount_minor, currency, status, created_at, updated_at
            FROM payments
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(payment_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let payment: PaymentRecord = match payment_row {
            Some(row) => row.into(),
            None => return Err(WebhookError::UnmappedIntent(event.intent_id.clone())),
        };

        let order_row: Option<OrderLockRow> = sqlx::query_as(
            r#"
            SELECT id, customer_id, status, payment_status, totals_snapshot,
                   is_snapshot_locked, payment_method, payment_transaction_id
            FROM orders
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(payment.order_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        // Order row missing means our own write has not landed; 503 so the
        // provider retries later.
        let order: OrderRecord = match order_row {
            Some(row) => row.into(),
            None => return Err(WebhookError::UnmappedIntent(event.intent_id.clone())),
        };

        // 2. Re-evaluate the decision against the locked rows
        match decide(&payment, &order, event) {
            TransitionDecision::Conflict(reason) => {
                // Full rollback: a conflicting event must never be marked
                // consumed, so the provider retries it as a genuine failure.
                tx.rollback().await.map_err(db_err)?;
                Err(WebhookError::Conflict(reason))
            }

            TransitionDecision::AlreadySettled => {
                tx.rollback().await.map_err(db_err)?;
                Ok(TransitionOutcome::AlreadySettled)
            }

            TransitionDecision::RecordOnly => {
                let Some(event_row_id) = record_event(&mut tx, &payment.provider, event).await?
                else {
                    tx.rollback().await.map_err(db_err)?;
                    return Ok(TransitionOutcome::DuplicateEvent);
                };
                // Mark it processed so the provider never retries, but move
                // no state backward.
                finalize_event(&mut tx, event_row_id, &order.id).await?;
                tx.commit().await.map_err(db_err)?;
                Ok(TransitionOutcome::RecordedOnly)
            }

            TransitionDecision::ApplySuccess { payment_method } => {
                let Some(event_row_id) = record_event(&mut tx, &payment.provider, event).await?
                else {
                    tx.rollback().await.map_err(db_err)?;
                    return Ok(TransitionOutcome::DuplicateEvent);
                };

                sqlx::query("UPDATE payments SET status = 'paid', updated_at = now() WHERE id = $1")
                    .bind(payment.id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_err)?;

                sqlx::query(
                    r#"
                    UPDATE orders
                    SET status = 'confirmed',
                        payment_status = 'paid',
                        payment_method = COALESCE($2, payment_method),
                        payment_transaction_id = $3
                    WHERE id = $1
                    "#,
                )
                .bind(order.id.as_uuid())
                .bind(payment_method.as_deref())
                .bind(&payment.provider_intent_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;

                append_history(&mut tx, &order.id, OrderStatus::Confirmed).await?;
                finalize_event(&mut tx, event_row_id, &order.id).await?;
                tx.commit().await.map_err(db_err)?;
                Ok(TransitionOutcome::Applied { order_id: order.id })
            }

            TransitionDecision::ApplyFailure => {
                let Some(event_row_id) = record_event(&mut tx, &payment.provider, event).await?
                else {
                    tx.rollback().await.map_err(db_err)?;
                    return Ok(TransitionOutcome::DuplicateEvent);
                };

                sqlx::query(
                    "UPDATE payments SET status = 'failed', updated_at = now() WHERE id = $1",
                )
                .bind(payment.id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;

                // The order keeps its status so the customer can retry; only
                // the payment status flips.
                sqlx::query("UPDATE orders SET payment_status = 'failed' WHERE id = $1")
                    .bind(order.id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_err)?;

                append_history(&mut tx, &order.id, order.status).await?;
                finalize_event(&mut tx, event_row_id, &order.id).await?;
                tx.commit().await.map_err(db_err)?;
                Ok(TransitionOutcome::Applied { order_id: order.id })
            }
        }
    }
}
