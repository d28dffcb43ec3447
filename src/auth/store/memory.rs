//! In-memory client store.

use super::ProfileStore;
use crate::auth::error::StoreError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::instrument;

/// In-memory client store.
///
/// Uses `Arc<RwLock<HashMap>>` so clones share the same profile. Useful for
/// tests and for embedding the handshake outside an HTTP server.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new empty MemoryStore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MemoryStore with an initial value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = HashMap::new();
        map.insert(key.into(), value.into());
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }
}

impl ProfileStore for MemoryStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    #[instrument(skip(self, value))]
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        guard.remove(key);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
