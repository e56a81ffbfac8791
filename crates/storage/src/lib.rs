//! Persistent key/value settings for waytrace.
//!
//! Backed by SQLite so flags survive process restart. The one flag the
//! updates service depends on is `requesting_location_updates`, written
//! whenever a subscription starts or stops (or fails due to permission loss)
//! so the persisted value always reflects the true provider state.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

/// Settings key for the "updates requested" flag.
pub const KEY_REQUESTING_UPDATES: &str = "requesting_location_updates";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no data directory available on this system")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Key/value settings store shared by the service.
///
/// Thread-safe; all access serializes on an internal mutex.
pub struct SettingsStore {
    conn: Mutex<Connection>,
}

impl SettingsStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open the store at the platform data directory
    /// (`<data_dir>/waytrace/settings.db`), creating it if needed.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?.join("waytrace");
        std::fs::create_dir_all(&dir)?;
        Self::open(&dir.join("settings.db"))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().expect("settings mutex poisoned");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Read a raw setting value.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("settings mutex poisoned");
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(StorageError::DatabaseError(other)),
            })?;
        Ok(value)
    }

    /// Write a raw setting value.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().expect("settings mutex poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            (key, value),
        )?;
        Ok(())
    }

    /// Whether location updates are currently requested.
    ///
    /// Defaults to `false` when the flag was never written.
    pub fn is_requesting_updates(&self) -> Result<bool> {
        Ok(self.get(KEY_REQUESTING_UPDATES)?.as_deref() == Some("true"))
    }

    /// Persist the "updates requested" flag.
    pub fn set_requesting_updates(&self, requesting: bool) -> Result<()> {
        tracing::debug!(requesting, "persisting requesting-updates flag");
        self.set(
            KEY_REQUESTING_UPDATES,
            if requesting { "true" } else { "false" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requesting_updates_defaults_false() {
        let store = SettingsStore::open_in_memory().unwrap();
        assert!(!store.is_requesting_updates().unwrap());
    }

    #[test]
    fn test_requesting_updates_roundtrip() {
        let store = SettingsStore::open_in_memory().unwrap();

        store.set_requesting_updates(true).unwrap();
        assert!(store.is_requesting_updates().unwrap());

        store.set_requesting_updates(false).unwrap();
        assert!(!store.is_requesting_updates().unwrap());
    }

    #[test]
    fn test_get_missing_key() {
        let store = SettingsStore::open_in_memory().unwrap();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = SettingsStore::open_in_memory().unwrap();
        store.set("k", "a").unwrap();
        store.set("k", "b").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("b"));
    }
}
