//! Redb-backed persistent key-value store.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use super::{KVError, KVResult, KVStore};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// A persistent key-value store backed by redb.
///
/// Each trait call is one transaction, so batch operations commit
/// atomically: a failed import writes nothing.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> KVResult<Self> {
        let db = Database::create(path).map_err(|e| KVError::Storage(e.to_string()))?;

        let tx = db.begin_write().map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let _ = tx.open_table(TABLE).map_err(|e| KVError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| KVError::Storage(e.to_string()))?;

        Ok(Self { db })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>> {
        let tx = self.db.begin_read().map_err(|e| KVError::Storage(e.to_string()))?;
        let table = tx.open_table(TABLE).map_err(|e| KVError::Storage(e.to_string()))?;

        match table.get(key).map_err(|e| KVError::Storage(e.to_string()))? {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> KVResult<()> {
        self.batch_set(&[(key, value)])
    }

    fn delete(&self, key: &str) -> KVResult<()> {
        self.batch_delete(&[key])
    }

    fn scan(&self, prefix: &str) -> KVResult<Vec<(String, Vec<u8>)>> {
        let tx = self.db.begin_read().map_err(|e| KVError::Storage(e.to_string()))?;
        let table = tx.open_table(TABLE).map_err(|e| KVError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        for item in table.iter().map_err(|e| KVError::Storage(e.to_string()))? {
            let (key, value) = item.map_err(|e| KVError::Storage(e.to_string()))?;
            let key_str = key.value();
            if key_str.starts_with(prefix) {
                results.push((key_str.to_string(), value.value().to_vec()));
            }
        }

        results.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(results)
    }

    fn batch_set(&self, entries: &[(&str, &[u8])]) -> KVResult<()> {
        let tx = self.db.begin_write().map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = tx.open_table(TABLE).map_err(|e| KVError::Storage(e.to_string()))?;
            for (key, value) in entries {
                table
                    .insert(*key, *value)
                    .map_err(|e| KVError::Storage(e.to_string()))?;
            }
        }
        tx.commit().map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(())
    }

    fn batch_delete(&self, keys: &[&str]) -> KVResult<()> {
        let tx = self.db.begin_write().map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = tx.open_table(TABLE).map_err(|e| KVError::Storage(e.to_string()))?;
            for key in keys {
                table
                    .remove(*key)
                    .map_err(|e| KVError::Storage(e.to_string()))?;
            }
        }
        tx.commit().map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(())
    }
}
