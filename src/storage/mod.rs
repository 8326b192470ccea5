//! Persistent key-value storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - A `KeyValueStore` trait: whole values in, whole values out
//! - JSON helpers for storing entity collections under a single key
//!
//! Every write replaces the full value stored under a key. There are no
//! cross-key transactions and no optimistic concurrency: the last writer wins.

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and kv tables
const SCHEMA_VERSION: u32 = 1;

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "quickcourt.db";

/// Key holding the serialized lobby collection.
pub const LOBBIES_KEY: &str = "quickcourt_lobbies";

/// Key holding the serialized signed-in user.
pub const USER_KEY: &str = "quickcourt_user";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Could not determine data directory
    #[error("could not determine data directory")]
    NoDataDirectory,
    /// Schema version mismatch (future version)
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    /// Failed to create data directory
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(#[source] std::io::Error),
    /// A stored value could not be decoded
    #[error("malformed value under key {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// A value could not be encoded for storage
    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A durable string-to-string store.
///
/// Implementations must make `set` replace the previous value in full.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`, if any.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Read and decode a JSON value.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Malformed {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encode a value as JSON and store it.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }
}

/// The main storage handle for QuickCourt data.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the storage database inside `dir`.
    pub fn open_in_dir(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(StorageError::CreateDirFailed)?;
        Self::open(&dir.join(DATABASE_FILE))
    }

    /// Open or create the storage database at an explicit path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        debug!(path = %path.display(), "opened storage");
        Ok(storage)
    }

    /// Open an in-memory database (ephemeral sessions and tests).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory for QuickCourt.
    ///
    /// - Linux: `$XDG_DATA_HOME/quickcourt/` or `~/.local/share/quickcourt/`
    /// - macOS: `~/Library/Application Support/quickcourt/`
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "quickcourt")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Number of keys currently stored.
    pub fn key_count(&self) -> Result<i64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(count)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        match current_version {
            // Fresh database
            0 => self.create_schema_v1(),
            // Database is from a newer version of QuickCourt
            found if found > SCHEMA_VERSION => Err(StorageError::FutureSchemaVersion {
                found,
                supported: SCHEMA_VERSION,
            }),
            _ => Ok(()),
        }
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: Option<u32> = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(version.unwrap_or(0))
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version and creation time
            CREATE TABLE IF NOT EXISTS meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Key-value table: one serialized collection per key
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        self.conn.execute("DELETE FROM meta", [])?;
        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now_millis()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_storage_creation() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.get_schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(storage.key_count().unwrap(), 0);
    }

    #[test]
    fn test_get_missing_key() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_replaces_whole_value() {
        let storage = Storage::open_in_memory().unwrap();

        storage.set("k", "first").unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("first".to_string()));

        storage.set("k", "second").unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("second".to_string()));
        assert_eq!(storage.key_count().unwrap(), 1);
    }

    #[test]
    fn test_remove() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);

        // Removing an absent key is not an error
        storage.remove("k").unwrap();
    }

    #[test]
    fn test_json_roundtrip() {
        let storage = Storage::open_in_memory().unwrap();
        let sample = vec![
            Sample { name: "Alex".to_string(), count: 2 },
            Sample { name: "Jane \"J\" Doe".to_string(), count: 0 },
        ];

        storage.set_json("samples", &sample).unwrap();
        let loaded: Vec<Sample> = storage.get_json("samples").unwrap().unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_json_malformed() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set("samples", "{not json").unwrap();

        let result: Result<Option<Vec<Sample>>, _> = storage.get_json("samples");
        match result {
            Err(StorageError::Malformed { key, .. }) => assert_eq!(key, "samples"),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_future_schema_rejected() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .conn
            .execute("UPDATE meta SET schema_version = ?1", params![SCHEMA_VERSION + 1])
            .unwrap();

        match storage.initialize_schema() {
            Err(StorageError::FutureSchemaVersion { found, supported }) => {
                assert_eq!(found, SCHEMA_VERSION + 1);
                assert_eq!(supported, SCHEMA_VERSION);
            }
            other => panic!("expected FutureSchemaVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_reinitialize_is_idempotent() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set("k", "v").unwrap();
        storage.initialize_schema().unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_open_in_dir_persists() {
        let dir = std::env::temp_dir().join(format!("quickcourt-test-{}", now_millis()));
        {
            let storage = Storage::open_in_dir(&dir).unwrap();
            storage.set(LOBBIES_KEY, "[]").unwrap();
        }
        {
            let storage = Storage::open_in_dir(&dir).unwrap();
            assert_eq!(storage.get(LOBBIES_KEY).unwrap(), Some("[]".to_string()));
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::FutureSchemaVersion { found: 3, supported: 1 };
        assert_eq!(
            err.to_string(),
            "database schema version 3 is newer than supported version 1"
        );
    }
}
