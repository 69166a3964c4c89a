//! Payment row persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::payment::{NewPayment, PaymentRecord};

/// Persistence for payment attempt rows.
///
/// Rows are append-then-transition: `insert` is the only way a row comes to
/// exist, and the transition store is the only thing that changes status
/// afterwards.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a new payment row in `intent_created` state.
    ///
    /// The row's `checkout_attempt_key` is unique; inserting a duplicate key
    /// is a persistence error, not a business outcome. At most one
    /// `intent_created` row may exist per order; a second insert fails with
    /// `ErrorCode::OpenIntentExists` so the caller can re-read the winner.
    async fn insert(&self, payment: NewPayment) -> Result<PaymentRecord, DomainError>;

    /// Move any `intent_created` rows for this order to `superseded`, freeing
    /// the one-open-intent-per-order slot before a replacement is inserted.
    async fn supersede_open_intents(&self, order_id: &OrderId) -> Result<u64, DomainError>;

    /// Most recent row for this order still in `intent_created` state, used
    /// for the reuse path during checkout.
    async fn find_latest_intent_created(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<PaymentRecord>, DomainError>;

    /// Look up the row a webhook event refers to.
    async fn find_by_provider_intent(
        &self,
        provider: &str,
        provider_intent_id: &str,
    ) -> Result<Option<PaymentRecord>, DomainError>;

    /// Most recent row for this order regardless of state, used by the
    /// status projection.
    async fn find_latest_for_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<PaymentRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PaymentRepository) {}
    }
}
