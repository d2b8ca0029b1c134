//! API key entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the api_keys table. Only the hash of the key is stored.
#[derive(Debug, Clone, FromRow)]
pub struct ApiKeyEntity {
    pub id: i64,
    pub key_hash: String,
    pub key_prefix: String,
    pub name: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Whether a stored key may authenticate at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Usable,
    Revoked,
    Expired,
}

impl ApiKeyEntity {
    /// A key stays usable through the instant it expires.
    pub fn status_at(&self, at: DateTime<Utc>) -> KeyStatus {
        if !self.is_active {
            return KeyStatus::Revoked;
        }
        match self.expires_at {
            Some(expires_at) if expires_at < at => KeyStatus::Expired,
            _ => KeyStatus::Usable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn storefront_key(is_active: bool, expires_at: Option<DateTime<Utc>>) -> ApiKeyEntity {
        ApiKeyEntity {
            id: 7,
            key_hash: "0".repeat(64),
            key_prefix: "stOrEfrt".to_string(),
            name: "storefront".to_string(),
            is_active,
            is_admin: false,
            last_used_at: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            expires_at,
        }
    }

    #[test]
    fn test_key_without_expiry_is_usable() {
        let now = Utc::now();
        assert_eq!(storefront_key(true, None).status_at(now), KeyStatus::Usable);
    }

    #[test]
    fn test_revoked_wins_over_expiry() {
        let now = Utc::now();
        let key = storefront_key(false, Some(now - Duration::days(3)));
        assert_eq!(key.status_at(now), KeyStatus::Revoked);
    }

    #[test]
    fn test_expiry_boundary() {
        let expiry = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let key = storefront_key(true, Some(expiry));
        assert_eq!(key.status_at(expiry), KeyStatus::Usable);
        assert_eq!(
            key.status_at(expiry + Duration::seconds(1)),
            KeyStatus::Expired
        );
    }
}
