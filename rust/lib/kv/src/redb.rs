use std::path::Path;

use redb::backends::InMemoryBackend;
use redb::{Database, Table, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

type KvTable<'txn> = Table<'txn, &'static str, &'static [u8]>;

/// KVStore backed by redb, a pure-Rust embedded key-value database.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(KVError::storage)?;
        debug!("opened redb store at {}", path.display());
        Self::init(db)
    }

    /// Create a store that lives only in memory. Used by tests and by
    /// throwaway demo servers.
    pub fn open_in_memory() -> Result<Self, KVError> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(KVError::storage)?;
        Self::init(db)
    }

    fn init(db: Database) -> Result<Self, KVError> {
        let store = Self { db };
        // Opening the table in a write transaction creates it, so later
        // read transactions never see a missing table.
        store.write(|_| Ok(()))?;
        Ok(store)
    }

    fn write<F>(&self, f: F) -> Result<(), KVError>
    where
        F: FnOnce(&mut KvTable<'_>) -> Result<(), KVError>,
    {
        let txn = self.db.begin_write().map_err(KVError::storage)?;
        {
            let mut table = txn.open_table(TABLE).map_err(KVError::storage)?;
            f(&mut table)?;
        }
        txn.commit().map_err(KVError::storage)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = txn.open_table(TABLE).map_err(KVError::storage)?;
        let value = table.get(key).map_err(KVError::storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.write(|table| {
            table.insert(key, value).map_err(KVError::storage)?;
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.write(|table| {
            table.remove(key).map_err(KVError::storage)?;
            Ok(())
        })
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        self.write(|table| {
            for key in keys {
                table.remove(*key).map_err(KVError::storage)?;
            }
            Ok(())
        })
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = txn.open_table(TABLE).map_err(KVError::storage)?;

        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(KVError::storage)? {
            let (key, value) = entry.map_err(KVError::storage)?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_string(), value.value().to_vec()));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let store = RedbStore::open(tmp.path()).unwrap();

        assert_eq!(store.get("panel:product:1").unwrap(), None);
        store.set("panel:product:1", b"picanha").unwrap();
        assert_eq!(store.get("panel:product:1").unwrap(), Some(b"picanha".to_vec()));

        store.delete("panel:product:1").unwrap();
        assert_eq!(store.get("panel:product:1").unwrap(), None);

        // Missing keys delete cleanly.
        store.delete("panel:product:1").unwrap();
    }

    #[test]
    fn scan_stops_at_prefix_boundary() {
        let store = RedbStore::open_in_memory().unwrap();
        store.set("panel:assoc:a", b"1").unwrap();
        store.set("panel:assoc:b", b"2").unwrap();
        store.set("panel:panel:a", b"3").unwrap();
        store.set("panel:assoc", b"bare").unwrap();

        let entries = store.scan("panel:assoc:").unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["panel:assoc:a", "panel:assoc:b"]);
    }

    #[test]
    fn batch_delete_removes_all() {
        let store = RedbStore::open_in_memory().unwrap();
        store.set("k:1", b"a").unwrap();
        store.set("k:2", b"b").unwrap();
        store.set("k:3", b"c").unwrap();

        store.batch_delete(&["k:1", "k:3", "k:missing"]).unwrap();
        let left = store.scan("k:").unwrap();
        assert_eq!(left, vec![("k:2".to_string(), b"b".to_vec())]);
    }
}
