//! SQLite-backed key-value storage.
//!
//! Every piece of persisted state is one JSON document under one key. The
//! deck reads each key once at startup and rewrites it after every change.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::{CoreError, DatabaseError, Result};

/// Pending tasks, newest first.
pub const PENDING_TASKS_KEY: &str = "vibeTasks";
/// Profile counters.
pub const PROFILE_KEY: &str = "vibeProfile";
/// Completed tasks, newest first.
pub const HISTORY_KEY: &str = "vibeHistory";

/// SQLite database holding the `kv` table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/vibedeck.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("vibedeck.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database. Nothing survives the process.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Read and decode a JSON document. `Ok(None)` when the key is absent.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.kv_get(key).map_err(CoreError::from)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a JSON document.
    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv_set(key, &raw).map_err(CoreError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn json_documents_roundtrip() {
        let db = Database::open_memory().unwrap();
        let profile = Profile {
            name: "Vibe Coder".into(),
            vibes_completed: 3,
            current_streak: 2,
        };
        db.save_json(PROFILE_KEY, &profile).unwrap();
        let loaded: Profile = db.load_json(PROFILE_KEY).unwrap().unwrap();
        assert_eq!(loaded, profile);
        assert_eq!(
            db.kv_get(PROFILE_KEY).unwrap().unwrap(),
            r#"{"name":"Vibe Coder","vibesCompleted":3,"currentStreak":2}"#
        );
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let db = Database::open_memory().unwrap();
        db.kv_set(PROFILE_KEY, "{not json").unwrap();
        assert!(matches!(
            db.load_json::<Profile>(PROFILE_KEY),
            Err(CoreError::Json(_))
        ));
    }

    #[test]
    fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vibedeck.db");
        Database::open_at(&path).unwrap().kv_set("k", "v").unwrap();
        assert_eq!(Database::open_at(&path).unwrap().kv_get("k").unwrap().as_deref(), Some("v"));
    }
}
