use crate::config::VOLUME_KEY;
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(target_arch = "wasm32")]
use gloo_storage::{errors::StorageError, LocalStorage, Storage};
#[cfg(not(target_arch = "wasm32"))]
use rusqlite::OptionalExtension;

/// Volume used when nothing usable has been persisted.
pub const DEFAULT_VOLUME: u8 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistent storage is unavailable")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[cfg(target_arch = "wasm32")]
impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        Self::Backend(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Client-local persistent storage for the single volume entry.
pub trait VolumeStore {
    /// Raw persisted value, `None` if nothing was ever written.
    fn read_volume(&self) -> Result<Option<String>, StoreError>;
    fn write_volume(&mut self, volume: u8) -> Result<(), StoreError>;
}

/// Parse a persisted volume string. Out-of-range numbers are clamped and
/// fractions rounded; anything that is not a finite number is rejected.
pub fn parse_volume(raw: &str) -> Option<u8> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 100.0) as u8)
}

/// Read the persisted volume once, falling back to [`DEFAULT_VOLUME`].
pub fn load_volume<S: VolumeStore + ?Sized>(store: &S) -> u8 {
    match store.read_volume() {
        Ok(Some(raw)) => parse_volume(&raw).unwrap_or_else(|| {
            debug!(raw = %raw, "ignoring unparsable persisted volume");
            DEFAULT_VOLUME
        }),
        Ok(None) => DEFAULT_VOLUME,
        Err(err) => {
            warn!("failed to read persisted volume: {err}");
            DEFAULT_VOLUME
        }
    }
}

/// Browser `localStorage` backed store.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalVolumeStore;

#[cfg(target_arch = "wasm32")]
impl LocalVolumeStore {
    pub fn open() -> Self {
        Self
    }

    // `LocalStorage::raw` throws when storage is disabled, so probe first.
    fn available() -> bool {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .is_some()
    }
}

#[cfg(target_arch = "wasm32")]
impl VolumeStore for LocalVolumeStore {
    fn read_volume(&self) -> Result<Option<String>, StoreError> {
        if !Self::available() {
            return Err(StoreError::Unavailable);
        }
        LocalStorage::raw()
            .get_item(VOLUME_KEY)
            .map_err(|_| StoreError::Backend("localStorage.getItem failed".to_string()))
    }

    fn write_volume(&mut self, volume: u8) -> Result<(), StoreError> {
        if !Self::available() {
            return Err(StoreError::Unavailable);
        }
        LocalStorage::set(VOLUME_KEY, volume)?;
        Ok(())
    }
}

/// SQLite backed store for the desktop shell, sharing the `settings` table
/// layout used for other key/value preferences.
#[cfg(not(target_arch = "wasm32"))]
pub struct SqliteVolumeStore {
    conn: Option<rusqlite::Connection>,
}

#[cfg(not(target_arch = "wasm32"))]
impl SqliteVolumeStore {
    /// Open the settings database. Failure leaves the store unavailable
    /// instead of failing startup.
    pub fn open() -> Self {
        let conn = match get_db_connection() {
            Ok(conn) => Some(conn),
            Err(err) => {
                warn!("volume will not be persisted: {err}");
                None
            }
        };
        Self { conn }
    }

    fn connection(&self) -> Result<&rusqlite::Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Unavailable)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl VolumeStore for SqliteVolumeStore {
    fn read_volume(&self) -> Result<Option<String>, StoreError> {
        let value = self
            .connection()?
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [VOLUME_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_volume(&mut self, volume: u8) -> Result<(), StoreError> {
        self.connection()?.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            [VOLUME_KEY, volume.to_string().as_str()],
        )?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn get_db_connection() -> Result<rusqlite::Connection, StoreError> {
    let data_dir = dirs::data_dir()
        .map(|dir| dir.join("qaa-radio"))
        .ok_or(StoreError::Unavailable)?;
    std::fs::create_dir_all(&data_dir)
        .map_err(|e| StoreError::Backend(format!("failed to create {}: {e}", data_dir.display())))?;

    let conn = rusqlite::Connection::open(data_dir.join("qaa-radio.db"))?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(conn)
}

#[cfg(target_arch = "wasm32")]
pub type PlatformStore = LocalVolumeStore;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = SqliteVolumeStore;

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub value: Option<String>,
    pub writes: Vec<u8>,
    pub unavailable: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl VolumeStore for MemoryStore {
    fn read_volume(&self) -> Result<Option<String>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(self.value.clone())
    }

    fn write_volume(&mut self, volume: u8) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        self.value = Some(volume.to_string());
        self.writes.push(volume);
        Ok(())
    }
}
