//! SQLite-based store implementation

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};
use verdant_util::IdentityKey;

use crate::{ProfileStore, SessionSnapshot, StoreResult};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- One durable slot per identity
            CREATE TABLE IF NOT EXISTS profiles (
                identity TEXT PRIMARY KEY,
                snapshot_json TEXT NOT NULL,
                export_csv TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

impl ProfileStore for SqliteStore {
    fn load(&self, identity: &IdentityKey) -> StoreResult<Option<SessionSnapshot>> {
        let conn = self.conn.lock().unwrap();

        let json: Option<String> = conn
            .query_row(
                "SELECT snapshot_json FROM profiles WHERE identity = ?",
                [identity.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(s) => {
                let snapshot: SessionSnapshot = serde_json::from_str(&s)?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    fn save(
        &self,
        identity: &IdentityKey,
        snapshot: &SessionSnapshot,
        export_csv: &str,
    ) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let json = serde_json::to_string(snapshot)?;

        conn.execute(
            r#"
            INSERT INTO profiles (identity, snapshot_json, export_csv, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(identity)
            DO UPDATE SET snapshot_json = excluded.snapshot_json,
                          export_csv = excluded.export_csv,
                          updated_at = excluded.updated_at
            "#,
            params![
                identity.as_str(),
                json,
                export_csv,
                verdant_util::now().to_rfc3339()
            ],
        )?;

        debug!(identity = %identity, transactions = snapshot.all_transactions.len(), "Snapshot saved");
        Ok(())
    }

    fn delete(&self, identity: &IdentityKey) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM profiles WHERE identity = ?",
            [identity.as_str()],
        )?;

        debug!(identity = %identity, "Slot deleted");
        Ok(())
    }

    fn cached_export(&self, identity: &IdentityKey) -> StoreResult<Option<String>> {
        let conn = self.conn.lock().unwrap();

        let csv: Option<String> = conn
            .query_row(
                "SELECT export_csv FROM profiles WHERE identity = ?",
                [identity.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(csv)
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use verdant_api::GoalStatus;

    fn identity(name: &str) -> IdentityKey {
        IdentityKey::new(name)
    }

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.is_healthy());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let alice = identity("alice");

        // Nothing saved yet
        assert!(store.load(&alice).unwrap().is_none());
        assert!(store.cached_export(&alice).unwrap().is_none());

        let snapshot = SessionSnapshot {
            green_points: 120,
            goal_status: GoalStatus::Success,
            transaction_count: 4,
            claimed_rewards: vec!["plant-sapling".to_string()],
            ..SessionSnapshot::default()
        };
        store.save(&alice, &snapshot, "section,field\r\n").unwrap();

        let loaded = store.load(&alice).unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(
            store.cached_export(&alice).unwrap().unwrap(),
            "section,field\r\n"
        );
    }

    #[test]
    fn test_save_overwrites_slot() {
        let store = SqliteStore::in_memory().unwrap();
        let alice = identity("alice");

        let first = SessionSnapshot {
            green_points: 10,
            ..SessionSnapshot::default()
        };
        store.save(&alice, &first, "one").unwrap();

        let second = SessionSnapshot {
            green_points: 99,
            ..SessionSnapshot::default()
        };
        store.save(&alice, &second, "two").unwrap();

        let loaded = store.load(&alice).unwrap().unwrap();
        assert_eq!(loaded.green_points, 99);
        assert_eq!(store.cached_export(&alice).unwrap().unwrap(), "two");
    }

    #[test]
    fn test_identities_are_isolated() {
        let store = SqliteStore::in_memory().unwrap();
        let alice = identity("alice");
        let bob = identity("bob");

        let snapshot = SessionSnapshot {
            green_points: 50,
            ..SessionSnapshot::default()
        };
        store.save(&alice, &snapshot, "alice-export").unwrap();

        assert!(store.load(&bob).unwrap().is_none());

        store.delete(&bob).unwrap();
        assert!(store.load(&alice).unwrap().is_some());
    }

    #[test]
    fn test_delete_removes_slot() {
        let store = SqliteStore::in_memory().unwrap();
        let alice = identity("alice");

        store
            .save(&alice, &SessionSnapshot::default(), "export")
            .unwrap();
        assert!(store.load(&alice).unwrap().is_some());

        store.delete(&alice).unwrap();
        assert!(store.load(&alice).unwrap().is_none());
        assert!(store.cached_export(&alice).unwrap().is_none());

        // Deleting an absent slot is not an error
        store.delete(&alice).unwrap();
    }

    #[test]
    fn test_corrupt_snapshot_surfaces_as_error() {
        let store = SqliteStore::in_memory().unwrap();
        let alice = identity("alice");

        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO profiles (identity, snapshot_json, export_csv, updated_at) VALUES (?, ?, ?, ?)",
                params![alice.as_str(), "{not json", "", "2026-08-23T00:00:00Z"],
            )
            .unwrap();
        }

        let result = store.load(&alice);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.db");
        let alice = identity("alice");

        {
            let store = SqliteStore::open(&path).unwrap();
            let snapshot = SessionSnapshot {
                green_points: 77,
                ..SessionSnapshot::default()
            };
            store.save(&alice, &snapshot, "export").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let loaded = store.load(&alice).unwrap().unwrap();
        assert_eq!(loaded.green_points, 77);
    }
}
