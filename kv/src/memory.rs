//! In-memory key-value store for tests and ephemeral profiles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{KvError, KvResult, KvStore};

/// An in-memory [`KvStore`]. Data is lost on drop.
///
/// Cloning yields a handle to the same underlying map, which lets tests
/// inspect what a component wrote through its own handle.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.data.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns true when no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let data = self
            .data
            .lock()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        data.remove(key);
        Ok(())
    }
}
