//! User attribute repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::errors::BoxError;
use domain::services::UserAttributeStore;

use crate::entities::UserAttributeEntity;
use crate::metrics::QueryTimer;

/// Repository for the generic per-user key/value attributes.
#[derive(Clone)]
pub struct UserAttributeRepository {
    pool: PgPool,
}

impl UserAttributeRepository {
    /// Creates a new UserAttributeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a single attribute.
    pub async fn get(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<Option<UserAttributeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_user_attribute");
        let result = sqlx::query_as::<_, UserAttributeEntity>(
            r#"
            SELECT user_id, attr_key, attr_value, created_at, updated_at
            FROM user_attributes
            WHERE user_id = $1 AND attr_key = $2
            "#,
        )
        .bind(user_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Upsert several attributes of one user within a transaction.
    pub async fn upsert_many(
        &self,
        user_id: Uuid,
        values: &[(&str, String)],
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("upsert_user_attributes");
        let result = self.upsert_in_tx(user_id, values).await;
        timer.finish(&result);
        result?;

        tracing::debug!(user_id = %user_id, count = values.len(), "User attributes upserted");
        Ok(())
    }

    async fn upsert_in_tx(&self, user_id: Uuid, values: &[(&str, String)]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for (key, value) in values {
            sqlx::query(
                r#"
                INSERT INTO user_attributes (user_id, attr_key, attr_value)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, attr_key)
                DO UPDATE SET attr_value = EXCLUDED.attr_value, updated_at = NOW()
                "#,
            )
            .bind(user_id)
            .bind(*key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }
}

#[async_trait::async_trait]
impl UserAttributeStore for UserAttributeRepository {
    async fn get_attribute(&self, user_id: Uuid, key: &str) -> Result<Option<String>, BoxError> {
        let entity = self.get(user_id, key).await?;
        Ok(entity.map(|e| e.attr_value))
    }

    async fn set_attributes(
        &self,
        user_id: Uuid,
        values: &[(&str, String)],
    ) -> Result<(), BoxError> {
        self.upsert_many(user_id, values).await?;
        Ok(())
    }
}
