//! Order entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{OrderRecord, OrderStatus};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for order_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "kebab-case")]
pub enum OrderStatusDb {
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
    Draft,
}

impl From<OrderStatusDb> for OrderStatus {
    fn from(status: OrderStatusDb) -> Self {
        match status {
            OrderStatusDb::Pending => OrderStatus::Pending,
            OrderStatusDb::Processing => OrderStatus::Processing,
            OrderStatusDb::OnHold => OrderStatus::OnHold,
            OrderStatusDb::Completed => OrderStatus::Completed,
            OrderStatusDb::Cancelled => OrderStatus::Cancelled,
            OrderStatusDb::Refunded => OrderStatus::Refunded,
            OrderStatusDb::Failed => OrderStatus::Failed,
            OrderStatusDb::Draft => OrderStatus::Draft,
        }
    }
}

/// Database row mapping for the orders table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderEntity {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: OrderStatusDb,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<OrderEntity> for OrderRecord {
    fn from(entity: OrderEntity) -> Self {
        Self {
            order_id: entity.id,
            created_at: entity.created_at,
            total: entity.total,
            status: entity.status.into(),
        }
    }
}
