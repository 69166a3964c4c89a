//! PostgreSQL implementation of PaymentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, PaymentId};
use crate::domain::payment::{NewPayment, PaymentRecord, PaymentStatus};
use crate::ports::PaymentRepository;

/// PostgreSQL implementation of the PaymentRepository port.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub provider: String,
    pub provider_intent_id: String,
    pub checkout_attempt_key: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentRow> for PaymentRecord {
    fn from(row: PaymentRow) -> Self {
        PaymentRecord {
            id: PaymentId::from_uuid(row.id),
            order_id: OrderId::from_uuid(row.order_id),
            provider: row.provider,
            provider_intent_id: row.provider_intent_id,
            checkout_attempt_key: row.checkout_attempt_key,
            amount_minor: row.amount_minor,
            currency: row.currency,
            status: PaymentStatus::normalize(&row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PAYMENT_COLUMNS: &str = "id, order_id, provider, provider_intent_id, \
     checkout_attempt_key, amount_minor, currency, status, created_at, updated_at";

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn insert(&self, payment: NewPayment) -> Result<PaymentRecord, DomainError> {
        let row: PaymentRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO payments (
                id, order_id, provider, provider_intent_id, checkout_attempt_key,
                amount_minor, currency, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 'intent_created', now(), now())
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(payment.order_id.as_uuid())
        .bind(&payment.provider)
        .bind(&payment.provider_intent_id)
        .bind(&payment.checkout_attempt_key)
        .bind(payment.amount_minor)
        .bind(&payment.currency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("payments_order_open_intent_key") {
                    return DomainError::new(
                        ErrorCode::OpenIntentExists,
                        "Another open intent already exists for this order",
                    );
                }
                if db_err.constraint() == Some("payments_checkout_attempt_key_key") {
                    return DomainError::new(
                        ErrorCode::DatabaseError,
                        "Duplicate checkout attempt key",
                    );
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert payment: {}", e))
        })?;

        Ok(row.into())
    }

    async fn supersede_open_intents(&self, order_id: &OrderId) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'superseded', updated_at = now()
            WHERE order_id = $1 AND status = 'intent_created'
            "#,
        )
        .bind(order_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to supersede open intents: {}", e),
            )
        })?;

        Ok(result.rows_affected())
    }

    async fn find_latest_intent_created(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM payments
            WHERE order_id = $1 AND status = 'intent_created'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find payment: {}", e))
        })?;

        Ok(row.map(Into::into))
    }

    async fn find_by_provider_intent(
        &self,
        provider: &str,
        provider_intent_id: &str,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM payments
            WHERE provider = $1 AND provider_intent_id = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(provider)
        .bind(provider_intent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find payment: {}", e))
        })?;

        Ok(row.map(Into::into))
    }

    async fn find_latest_for_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM payments
            WHERE order_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find payment: {}", e))
        })?;

        Ok(row.map(Into::into))
    }
}
