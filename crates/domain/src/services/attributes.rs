//! User attribute store abstraction.
//!
//! Per-customer configuration lives in a generic key/value store keyed by
//! customer id. The spend cap only ever reads and writes text values.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::errors::BoxError;

/// Generic per-user attribute get/set store.
#[async_trait::async_trait]
pub trait UserAttributeStore: Send + Sync {
    /// Read a single attribute, `None` when it was never set.
    async fn get_attribute(&self, user_id: Uuid, key: &str) -> Result<Option<String>, BoxError>;

    /// Write several attributes for one user atomically.
    async fn set_attributes(
        &self,
        user_id: Uuid,
        values: &[(&str, String)],
    ) -> Result<(), BoxError>;
}

/// In-memory attribute store for development and testing.
#[derive(Debug, Default)]
pub struct InMemoryAttributeStore {
    values: RwLock<HashMap<(Uuid, String), String>>,
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl InMemoryAttributeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every call fails.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Builder-style insert used to seed fixtures.
    pub fn with_attribute(self, user_id: Uuid, key: &str, value: &str) -> Self {
        if let Ok(mut values) = self.values.write() {
            values.insert((user_id, key.to_string()), value.to_string());
        }
        self
    }
}

#[async_trait::async_trait]
impl UserAttributeStore for InMemoryAttributeStore {
    async fn get_attribute(&self, user_id: Uuid, key: &str) -> Result<Option<String>, BoxError> {
        if self.simulate_failure {
            return Err("simulated attribute store failure".into());
        }
        let values = self
            .values
            .read()
            .map_err(|_| "attribute store lock poisoned")?;
        Ok(values.get(&(user_id, key.to_string())).cloned())
    }

    async fn set_attributes(
        &self,
        user_id: Uuid,
        values: &[(&str, String)],
    ) -> Result<(), BoxError> {
        if self.simulate_failure {
            return Err("simulated attribute store failure".into());
        }
        let mut stored = self
            .values
            .write()
            .map_err(|_| "attribute store lock poisoned")?;
        for (key, value) in values {
            stored.insert((user_id, key.to_string()), value.clone());
        }
        Ok(())
    }
}
