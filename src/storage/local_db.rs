// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistent local storage backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `local_storage`: key → value (both UTF-8 strings)

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{SessionStorage, StorageResult};

const LOCAL_STORAGE: TableDefinition<&str, &str> = TableDefinition::new("local_storage");

pub struct LocalDatabase {
    db: Database,
}

impl LocalDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LOCAL_STORAGE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl SessionStorage for LocalDatabase {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LOCAL_STORAGE)?;
        Ok(table.get(key)?.map(|value| value.value().to_string()))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LOCAL_STORAGE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LOCAL_STORAGE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (LocalDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalDatabase::open(&dir.path().join("session.redb")).unwrap();
        (db, dir)
    }

    #[test]
    fn set_get_remove() {
        let (db, _dir) = temp_db();
        assert_eq!(db.get_item("token").unwrap(), None);

        db.set_item("token", "abc").unwrap();
        assert_eq!(db.get_item("token").unwrap().as_deref(), Some("abc"));

        db.remove_item("token").unwrap();
        assert_eq!(db.get_item("token").unwrap(), None);

        // Removing again is harmless
        db.remove_item("token").unwrap();
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.redb");

        {
            let db = LocalDatabase::open(&path).unwrap();
            db.set_item("walletAddress", "0x742d35cc6634c0532925a3b844bc9e7595f4ab12")
                .unwrap();
        }

        let db = LocalDatabase::open(&path).unwrap();
        assert_eq!(
            db.get_item("walletAddress").unwrap().as_deref(),
            Some("0x742d35cc6634c0532925a3b844bc9e7595f4ab12")
        );
    }
}
