//! User attribute entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the user_attributes table.
#[derive(Debug, Clone, FromRow)]
pub struct UserAttributeEntity {
    pub user_id: Uuid,
    pub attr_key: String,
    pub attr_value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
