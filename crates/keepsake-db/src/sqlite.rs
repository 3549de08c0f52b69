use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use keepsake_types::models::{Capsule, NewCapsule};

use crate::CapsuleStore;
use crate::migrations;
use crate::queries::{insert_capsule, query_capsule_by_id};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;

        info!("Database opened in memory");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}

impl CapsuleStore for SqliteStore {
    fn insert(&self, capsule: &NewCapsule) -> Result<()> {
        self.with_conn(|conn| insert_capsule(conn, capsule))
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Capsule>> {
        let row = self.with_conn(|conn| query_capsule_by_id(conn, id))?;
        Ok(row.map(|r| r.into_capsule()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn new_capsule(id: &str) -> NewCapsule {
        NewCapsule {
            id: id.into(),
            ciphertext: "bm9uY2UtYW5kLWNpcGhlcnRleHQ=".into(),
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
            unlock_at: NaiveDate::from_ymd_opt(2026, 2, 9).unwrap(),
            sender_name: Some("Alex".into()),
            recipient_name: Some("Robin".into()),
            title: None,
        }
    }

    #[test]
    fn insert_then_fetch_returns_same_record() {
        let store = SqliteStore::open_in_memory().unwrap();
        let capsule = new_capsule("0b7c9a3e-1111-4c2b-9d55-6a1f00000001");
        store.insert(&capsule).unwrap();

        let fetched = store.get_by_id(&capsule.id).unwrap().unwrap();
        assert_eq!(fetched, capsule.to_capsule());
    }

    #[test]
    fn unknown_id_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get_by_id("does-not-exist").unwrap().is_none());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let capsule = new_capsule("dup");
        store.insert(&capsule).unwrap();
        assert!(store.insert(&capsule).is_err());
    }

    #[test]
    fn capsules_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capsules.db");
        let capsule = new_capsule("durable");

        SqliteStore::open(&path).unwrap().insert(&capsule).unwrap();

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get_by_id("durable").unwrap(), Some(capsule.to_capsule()));
    }

    #[test]
    fn legacy_row_without_unlock_date_loads() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO capsules (id, ciphertext, created_at) VALUES ('old', 'x', '2025-02-14T08:00:00')",
                    [],
                )?;
                Ok(())
            })
            .unwrap();

        let capsule = store.get_by_id("old").unwrap().unwrap();
        assert_eq!(capsule.unlock_at, None);
    }
}
