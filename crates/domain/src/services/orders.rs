//! Order query collaborator.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::BoxError;
use crate::models::{OrderRecord, OrderStatus};

/// Read-only access to a customer's order history.
#[async_trait::async_trait]
pub trait OrderQuery: Send + Sync {
    /// Orders of `customer_id` created at or after `since` in one of `statuses`.
    ///
    /// Implementations may be loose about the boundary; callers re-check it.
    async fn orders_since(
        &self,
        customer_id: Uuid,
        since: DateTime<Utc>,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderRecord>, BoxError>;
}

/// In-memory order store for development and testing.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<(Uuid, OrderRecord)>>,
    /// Return every order of the customer regardless of date and status.
    pub ignore_filters: bool,
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every query fails.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Create a store that hands back unfiltered results.
    pub fn unfiltered() -> Self {
        Self {
            ignore_filters: true,
            ..Self::default()
        }
    }

    /// Builder-style insert used to seed fixtures.
    pub fn with_order(self, customer_id: Uuid, order: OrderRecord) -> Self {
        if let Ok(mut orders) = self.orders.write() {
            orders.push((customer_id, order));
        }
        self
    }
}

#[async_trait::async_trait]
impl OrderQuery for InMemoryOrderStore {
    async fn orders_since(
        &self,
        customer_id: Uuid,
        since: DateTime<Utc>,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderRecord>, BoxError> {
        if self.simulate_failure {
            return Err("simulated order query failure".into());
        }
        let orders = self.orders.read().map_err(|_| "order store lock poisoned")?;
        Ok(orders
            .iter()
            .filter(|(owner, _)| *owner == customer_id)
            .filter(|(_, order)| {
                self.ignore_filters
                    || (order.created_at >= since && statuses.contains(&order.status))
            })
            .map(|(_, order)| order.clone())
            .collect())
    }
}
