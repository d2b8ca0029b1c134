//! Order repository: read-only access to storefront orders.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::errors::BoxError;
use domain::models::{OrderRecord, OrderStatus};
use domain::services::OrderQuery;

use crate::entities::OrderEntity;
use crate::metrics::QueryTimer;

/// Repository for order queries.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a new OrderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Orders of a customer created at or after `since` in one of `statuses`.
    pub async fn find_customer_orders_since(
        &self,
        customer_id: Uuid,
        since: DateTime<Utc>,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderEntity>, sqlx::Error> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
        let timer = QueryTimer::new("find_customer_orders_since");
        let result = sqlx::query_as::<_, OrderEntity>(
            r#"
            SELECT id, customer_id, status, total, created_at
            FROM orders
            WHERE customer_id = $1
              AND created_at >= $2
              AND status::text = ANY($3)
            ORDER BY created_at
            "#,
        )
        .bind(customer_id)
        .bind(since)
        .bind(&statuses)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}

#[async_trait::async_trait]
impl OrderQuery for OrderRepository {
    async fn orders_since(
        &self,
        customer_id: Uuid,
        since: DateTime<Utc>,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderRecord>, BoxError> {
        let orders = self
            .find_customer_orders_since(customer_id, since, statuses)
            .await?;
        Ok(orders.into_iter().map(OrderRecord::from).collect())
    }
}
