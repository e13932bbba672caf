//! Storage backend abstraction.
//!
//! The store persists through a namespaced key-value slot. On desktop the
//! slot maps to one JSON file per key under a data directory; when that
//! directory cannot be prepared the store degrades to an in-memory map
//! for the session, behind the same interface.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name used for the on-disk store.
pub const DATA_DIR_NAME: &str = "arduino-adventure";

/// Fallback directory relative to the working directory.
pub const FALLBACK_DIR_NAME: &str = "arduino-adventure-data";

/// Which kind of backend a store ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Durable file-backed storage.
    File,
    /// Session-only in-memory storage.
    Memory,
}

impl BackendKind {
    /// Returns display name for the backend kind.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

/// A namespaced key-value slot the store persists through.
pub trait StorageBackend {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes `value` under `key`.
    fn put(&mut self, key: &str, value: &str) -> io::Result<()>;

    /// Removes the value stored under `key`, if any.
    fn remove(&mut self, key: &str) -> io::Result<()>;

    /// Returns which kind of backend this is.
    fn kind(&self) -> BackendKind;
}

// ============================================================================
// File backend
// ============================================================================

/// File-backed storage: one `<key>.json` file per key.
pub struct FileBackend {
    /// Directory holding the slot files.
    dir: PathBuf,
}

impl FileBackend {
    /// Opens a backend rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!("file backend ready at {:?}", dir);
        Ok(Self { dir })
    }

    /// Returns the default data directory.
    ///
    /// Resolution order: `$XDG_DATA_HOME`, then the platform data dir,
    /// then a directory next to the executable's working directory.
    #[must_use]
    pub fn default_data_path() -> PathBuf {
        if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(data_home).join(DATA_DIR_NAME);
        }

        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join(DATA_DIR_NAME);
        }

        PathBuf::from(FALLBACK_DIR_NAME)
    }

    /// Returns the backing directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.tmp"))
    }

    /// Performs an atomic write (temp file + rename).
    fn atomic_write(&self, key: &str, value: &str) -> io::Result<()> {
        let temp_path = self.temp_path(key);
        let final_path = self.slot_path(key);

        fs::write(&temp_path, value)?;

        fs::rename(&temp_path, &final_path).map_err(|e| {
            // Clean up temp file on failure
            let _ = fs::remove_file(&temp_path);
            e
        })?;

        debug!("atomic write complete for slot: {}", key);
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.slot_path(key)).ok()
    }

    fn put(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.atomic_write(key, value)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::File
    }
}

// ============================================================================
// Memory backend
// ============================================================================

/// In-memory storage for tests and the degraded no-storage mode.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.slots.remove(key);
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_round_trip() {
        let mut backend = MemoryBackend::new();
        assert!(backend.get("slot").is_none());

        backend.put("slot", "{\"a\":1}").expect("put");
        assert_eq!(backend.get("slot").as_deref(), Some("{\"a\":1}"));

        backend.remove("slot").expect("remove");
        assert!(backend.get("slot").is_none());
        assert_eq!(backend.kind(), BackendKind::Memory);
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut backend = FileBackend::open(dir.path()).expect("open");

        backend.put("progress", "{\"xp\":100}").expect("put");
        assert_eq!(backend.get("progress").as_deref(), Some("{\"xp\":100}"));
        assert_eq!(backend.kind(), BackendKind::File);

        backend.remove("progress").expect("remove");
        assert!(backend.get("progress").is_none());
        // Removing again is fine.
        backend.remove("progress").expect("remove twice");
    }

    #[test]
    fn test_file_backend_creates_missing_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");

        let backend = FileBackend::open(&nested).expect("open");
        assert!(nested.exists());
        assert_eq!(backend.dir(), nested.as_path());
    }

    #[test]
    fn test_file_backend_leaves_no_temp_residue() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut backend = FileBackend::open(dir.path()).expect("open");

        backend.put("slot", "payload").expect("put");

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["slot.json".to_string()]);
    }

    #[test]
    fn test_file_backend_overwrites_existing_slot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut backend = FileBackend::open(dir.path()).expect("open");

        backend.put("slot", "first").expect("put");
        backend.put("slot", "second").expect("put");
        assert_eq!(backend.get("slot").as_deref(), Some("second"));
    }
}
