//! Durable key-value store backed by redb.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::{KvError, KvResult, KvStore};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

/// A persistent [`KvStore`] holding voice profile records in a single
/// redb table. One database file per installation.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Opens or creates a database file at `path`.
    /// The parent directory must already exist.
    pub fn open<P: AsRef<Path>>(path: P) -> KvResult<Self> {
        let db = Database::create(path).map_err(|e| KvError::Storage(e.to_string()))?;

        // Make sure the table exists so reads on a fresh file succeed.
        let tx = db
            .begin_write()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        {
            let _ = tx
                .open_table(TABLE)
                .map_err(|e| KvError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| KvError::Storage(e.to_string()))?;

        Ok(Self { db })
    }
}

impl KvStore for RedbStore {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        let table = tx
            .open_table(TABLE)
            .map_err(|e| KvError::Storage(e.to_string()))?;

        match table
            .get(key)
            .map_err(|e| KvError::Storage(e.to_string()))?
        {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(TABLE)
                .map_err(|e| KvError::Storage(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| KvError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(TABLE)
                .map_err(|e| KvError::Storage(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| KvError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(())
    }
}
