//! Order read port.
//!
//! Orders are owned by the ordering service; this subsystem only ever reads
//! them (and updates their payment fields through the transition store).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::payment::OrderRecord;

/// Read access to order rows.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetch an order by id. Returns `Ok(None)` when no such order exists.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<OrderRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn OrderRepository) {}
    }
}
