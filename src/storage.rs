//! Persistence seams for images and settings.
//!
//! The engine never knows the storage mechanism; it only requires stable
//! integer identifiers and byte-preserving round-trips. Implement
//! [`ImageStore`] and [`SettingsStore`] over whatever backend hosts the
//! engine (filesystem, browser storage, a database). The in-memory
//! implementations here back tests and serve as the no-persistence
//! fallback.
//!
//! Store failures are surfaced as [`StorageError`] and are always
//! non-fatal: the engine logs them and proceeds in memory.

use crate::config::Config;
use crate::error::StorageError;

/// A persisted image record: stable id, original bytes, display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Stable identifier matching the in-memory image.
    pub id: u64,
    /// Original encoded image bytes, preserved exactly.
    pub bytes: Vec<u8>,
    /// Display name.
    pub name: String,
}

/// Persistent store for source images.
pub trait ImageStore {
    /// Load every stored image in insertion order.
    fn load_all(&mut self) -> Result<Vec<StoredImage>, StorageError>;

    /// Persist an image's original bytes under its stable id.
    fn save(&mut self, id: u64, bytes: &[u8], name: &str) -> Result<(), StorageError>;

    /// Remove the image with the given id.
    fn delete(&mut self, id: u64) -> Result<(), StorageError>;

    /// Remove every stored image.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Persistent store for the configuration record.
pub trait SettingsStore {
    /// Load the persisted configuration, if one exists.
    fn load(&mut self) -> Result<Option<Config>, StorageError>;

    /// Persist the configuration. Debouncing is the caller's concern.
    fn save(&mut self, config: &Config) -> Result<(), StorageError>;
}

/// In-memory [`ImageStore`] for tests and persistence-free sessions.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    entries: Vec<StoredImage>,
}

impl MemoryImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ImageStore for MemoryImageStore {
    fn load_all(&mut self) -> Result<Vec<StoredImage>, StorageError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, id: u64, bytes: &[u8], name: &str) -> Result<(), StorageError> {
        let record = StoredImage {
            id,
            bytes: bytes.to_vec(),
            name: name.to_string(),
        };
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(existing) => *existing = record,
            None => self.entries.push(record),
        }
        Ok(())
    }

    fn delete(&mut self, id: u64) -> Result<(), StorageError> {
        self.entries.retain(|e| e.id != id);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}

/// In-memory [`SettingsStore`].
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    config: Option<Config>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&mut self) -> Result<Option<Config>, StorageError> {
        Ok(self.config.clone())
    }

    fn save(&mut self, config: &Config) -> Result<(), StorageError> {
        self.config = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryImageStore::new();
        store.save(0, &[1, 2, 3], "first").unwrap();
        store.save(1, &[4, 5], "second").unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].bytes, vec![1, 2, 3]);
        assert_eq!(loaded[1].name, "second");
    }

    #[test]
    fn test_save_same_id_overwrites() {
        let mut store = MemoryImageStore::new();
        store.save(7, &[1], "old").unwrap();
        store.save(7, &[2], "new").unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].bytes, vec![2]);
        assert_eq!(loaded[0].name, "new");
    }

    #[test]
    fn test_delete_and_clear() {
        let mut store = MemoryImageStore::new();
        store.save(0, &[1], "a").unwrap();
        store.save(1, &[2], "b").unwrap();

        store.delete(0).unwrap();
        assert_eq!(store.len(), 1);

        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_settings_round_trip() {
        let mut store = MemorySettingsStore::new();
        assert!(store.load().unwrap().is_none());

        let config = Config {
            opacity: 42.0,
            ..Config::default()
        };
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), Some(config));
    }
}
