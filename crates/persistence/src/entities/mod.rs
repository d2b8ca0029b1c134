//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod api_key;
pub mod order;
pub mod user_attribute;

pub use api_key::{ApiKeyEntity, KeyStatus};
pub use order::{OrderEntity, OrderStatusDb};
pub use user_attribute::UserAttributeEntity;
