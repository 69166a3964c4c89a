//! PostgreSQL implementation of OrderRepository.
//!
//! The orders table belongs to the ordering service; this adapter only
//! reads it. Status strings are normalized on the way in so a value this
//! subsystem does not know about degrades to a pending state instead of
//! failing the request.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, OrderId};
use crate::domain::payment::{OrderPaymentStatus, OrderRecord, OrderStatus, TotalsSnapshot};
use crate::ports::OrderRepository;

/// PostgreSQL implementation of the OrderRepository port.
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order, limited to the columns this
/// subsystem reads.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Uuid,
    status: String,
    payment_status: String,
    totals_snapshot: Option<serde_json::Value>,
    is_snapshot_locked: bool,
    payment_method: Option<String>,
    payment_transaction_id: Option<String>,
}

impl TryFrom<OrderRow> for OrderRecord {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        // A snapshot blob that does not deserialize is treated as absent;
        // the orchestrator then rejects the order as snapshot-not-locked
        // rather than charging a guessed amount.
        let totals_snapshot = row
            .totals_snapshot
            .and_then(|v| serde_json::from_value::<TotalsSnapshot>(v).ok());

        Ok(OrderRecord {
            id: OrderId::from_uuid(row.id),
            customer_id: CustomerId::from_uuid(row.customer_id),
            status: OrderStatus::normalize(&row.status),
            payment_status: OrderPaymentStatus::normalize(&row.payment_status),
            totals_snapshot,
            snapshot_locked: row.is_snapshot_locked,
            payment_method: row.payment_method,
            payment_transaction_id: row.payment_transaction_id,
        })
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<OrderRecord>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, customer_id, status, payment_status, totals_snapshot,
                   is_snapshot_locked, payment_method, payment_transaction_id
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find order: {}", e))
        })?;

        row.map(OrderRecord::try_from).transpose()
    }
}
