//! Key-value persistence for voice profile records.
//!
//! The profile store addresses exactly one serialized voiceprint record per
//! profile key, so the interface is deliberately small: get, set, delete.
//! [`MemoryStore`] backs tests and ephemeral sessions, [`RedbStore`] backs
//! durable per-installation storage.

pub mod memory;
pub mod redb;

use thiserror::Error;

/// Errors returned by key-value storage operations.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("kv: storage error: {0}")]
    Storage(String),
}

/// Result type for KV operations.
pub type KvResult<T> = Result<T, KvError>;

/// Durable key-value storage with string keys and byte values.
///
/// Implementations must be safe for concurrent use. A missing key is a
/// normal state reported as `Ok(None)`, never an error.
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    /// The write must be durably visible before this returns.
    fn set(&self, key: &str, value: &[u8]) -> KvResult<()>;

    /// Removes `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> KvResult<()>;
}

pub use memory::MemoryStore;
pub use redb::RedbStore;
