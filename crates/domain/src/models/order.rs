//! Order models as seen by the spend cap evaluator.
//!
//! Orders are owned by the storefront; this crate only reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
    Draft,
}

/// Statuses whose totals count toward a customer's spend.
pub const QUALIFYING_STATUSES: [OrderStatus; 3] = [
    OrderStatus::Completed,
    OrderStatus::Processing,
    OrderStatus::OnHold,
];

impl OrderStatus {
    /// Whether orders in this status count toward the spend cap.
    pub fn counts_toward_spend(&self) -> bool {
        QUALIFYING_STATUSES.contains(self)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::OnHold => write!(f, "on-hold"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
            OrderStatus::Refunded => write!(f, "refunded"),
            OrderStatus::Failed => write!(f, "failed"),
            OrderStatus::Draft => write!(f, "draft"),
        }
    }
}

/// A single order returned by the order-query collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub total: Decimal,
    pub status: OrderStatus,
}

impl OrderRecord {
    pub fn new(created_at: DateTime<Utc>, total: Decimal, status: OrderStatus) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            created_at,
            total,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifying_statuses() {
        assert!(OrderStatus::Completed.counts_toward_spend());
        assert!(OrderStatus::Processing.counts_toward_spend());
        assert!(OrderStatus::OnHold.counts_toward_spend());
        assert!(!OrderStatus::Pending.counts_toward_spend());
        assert!(!OrderStatus::Cancelled.counts_toward_spend());
        assert!(!OrderStatus::Refunded.counts_toward_spend());
        assert!(!OrderStatus::Failed.counts_toward_spend());
        assert!(!OrderStatus::Draft.counts_toward_spend());
    }

    #[test]
    fn test_order_status_display() {
        assert_eq!(OrderStatus::OnHold.to_string(), "on-hold");
        assert_eq!(OrderStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_order_status_serde_matches_display() {
        let json = serde_json::to_string(&OrderStatus::OnHold).unwrap();
        assert_eq!(json, r#""on-hold""#);
        let status: OrderStatus = serde_json::from_str(r#""processing""#).unwrap();
        assert_eq!(status, OrderStatus::Processing);
    }
}
