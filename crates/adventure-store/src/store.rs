//! Progress store: load, save, backup, reset, export/import.
//!
//! Exactly one progress record is persisted under the primary slot, plus
//! one rolling backup written after every successful save. Loading never
//! raises: a corrupt or missing primary falls back to the backup, and a
//! corrupt or missing backup falls back to a fresh default record.
//!
//! Concurrent writers (e.g. two instances sharing the same directory) are
//! not coordinated; the last writer wins. The design is single-user and
//! single-process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use adventure_core::{merge_with_defaults, validate, PlayerProgress, APP_NAME, SCHEMA_VERSION};

use crate::backend::{BackendKind, FileBackend, MemoryBackend, StorageBackend};

/// Primary slot key.
pub const STORAGE_KEY: &str = "arduino-adventure-data";

/// Rolling backup slot key.
pub const BACKUP_KEY: &str = "arduino-adventure-backup";

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error from the storage backend.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Payload that is not valid JSON.
    #[error("Unparseable payload: {0}")]
    Unparseable(String),

    /// Import payload tagged for a different application.
    #[error("Foreign data: expected app tag {expected:?}, found {found:?}")]
    ForeignData {
        /// Expected application tag.
        expected: String,
        /// Tag found in the payload.
        found: String,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Envelope written to the backup slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Snapshot of the validated record.
    pub data: PlayerProgress,
    /// When the backup was written.
    pub timestamp: DateTime<Utc>,
    /// Schema version at write time.
    pub version: String,
}

/// Summary of the store's state for display.
#[derive(Debug, Clone)]
pub struct StorageInfo {
    /// Backend in use.
    pub backend: BackendKind,
    /// Serialized size of the stored record in bytes.
    pub data_size: usize,
    /// Last persisted session timestamp.
    pub last_played: Option<DateTime<Utc>>,
    /// Total persisted sessions.
    pub total_sessions: u32,
    /// Levels completed.
    pub levels_completed: u32,
    /// Accumulated XP.
    pub total_xp: u32,
}

/// Durable, schema-tolerant store for the progress record.
pub struct ProgressStore {
    backend: Box<dyn StorageBackend>,
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::open_default()
    }
}

impl ProgressStore {
    /// Opens a store at the default data directory, degrading to an
    /// in-memory store if the directory cannot be prepared.
    #[must_use]
    pub fn open_default() -> Self {
        Self::open(FileBackend::default_data_path())
    }

    /// Opens a store rooted at `dir`, degrading to an in-memory store if
    /// the directory cannot be prepared. The degraded store serves the
    /// same interface; nothing survives process restart.
    #[must_use]
    pub fn open(dir: impl AsRef<std::path::Path>) -> Self {
        match FileBackend::open(dir.as_ref()) {
            Ok(backend) => Self {
                backend: Box::new(backend),
            },
            Err(e) => {
                warn!(
                    "storage unavailable at {:?} ({e}), using memory store for this session",
                    dir.as_ref()
                );
                Self::in_memory()
            }
        }
    }

    /// Creates a session-only in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(MemoryBackend::new()),
        }
    }

    /// Creates a store over a custom backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Returns which kind of backend the store ended up with.
    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Loads the progress record.
    ///
    /// A missing or corrupt primary slot falls back to the backup slot,
    /// and a missing or corrupt backup falls back to defaults. Loaded
    /// data is reconciled with the current schema and validated.
    #[must_use]
    pub fn load(&self) -> PlayerProgress {
        if let Some(raw) = self.backend.get(STORAGE_KEY) {
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => return validate(merge_with_defaults(&value)),
                Err(e) => warn!("primary slot corrupt ({e}), trying backup"),
            }
        }

        if let Some(record) = self.load_backup() {
            info!("restored progress from backup");
            return record;
        }

        info!("no stored progress, starting fresh");
        PlayerProgress::default()
    }

    /// Loads the backup snapshot, if a valid one exists.
    #[must_use]
    pub fn load_backup(&self) -> Option<PlayerProgress> {
        let raw = self.backend.get(BACKUP_KEY)?;
        match serde_json::from_str::<BackupRecord>(&raw) {
            Ok(backup) => {
                debug!("backup from {} available", backup.timestamp);
                Some(validate(backup.data))
            }
            Err(e) => {
                warn!("backup slot corrupt: {e}");
                None
            }
        }
    }

    /// Validates and persists the record, then writes the rolling backup.
    ///
    /// Stamps the session fields (`lastPlayed`, `totalSessions`, streak)
    /// on the caller's record. Returns `false` if the primary write
    /// failed; the in-memory record then remains the source of truth for
    /// the session. A backup write failure alone does not fail the save.
    pub fn save(&mut self, record: &mut PlayerProgress) -> bool {
        *record = validate(std::mem::take(record));
        record.record_session(Utc::now());

        match self.persist(record) {
            Ok(()) => {
                debug!(
                    "progress saved ({} levels, {} XP)",
                    record.levels_completed, record.total_xp
                );
                true
            }
            Err(e) => {
                warn!("failed to save progress: {e}");
                false
            }
        }
    }

    /// Writes the record to the primary slot and the backup slot.
    fn persist(&mut self, record: &PlayerProgress) -> StoreResult<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.put(STORAGE_KEY, &json)?;

        let backup = BackupRecord {
            data: record.clone(),
            timestamp: Utc::now(),
            version: SCHEMA_VERSION.to_string(),
        };
        match serde_json::to_string(&backup) {
            Ok(json) => {
                if let Err(e) = self.backend.put(BACKUP_KEY, &json) {
                    warn!("failed to write backup: {e}");
                }
            }
            Err(e) => warn!("failed to serialize backup: {e}"),
        }

        Ok(())
    }

    /// Replaces the persisted record with fresh defaults.
    ///
    /// Confirmation is the caller's concern; this method is the
    /// destructive step.
    pub fn reset(&mut self) -> PlayerProgress {
        let mut fresh = PlayerProgress::default();
        if !self.save(&mut fresh) {
            warn!("reset could not be persisted");
        }
        info!("progress reset to defaults");
        fresh
    }

    /// Serializes the stored record for export, tagged with the app name
    /// and export date.
    pub fn export(&self) -> StoreResult<String> {
        let record = self.load();
        let mut value = serde_json::to_value(&record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(obj) = value.as_object_mut() {
            obj.insert("exportDate".to_string(), Value::String(Utc::now().to_rfc3339()));
            obj.insert("version".to_string(), Value::String(SCHEMA_VERSION.to_string()));
            obj.insert("appName".to_string(), Value::String(APP_NAME.to_string()));
        }

        serde_json::to_string_pretty(&value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Imports a previously exported payload.
    ///
    /// Rejects unparseable payloads and payloads tagged for a different
    /// application; nothing is written in either case. On success the
    /// payload is reconciled, validated, and persisted.
    pub fn import(&mut self, payload: &str) -> StoreResult<PlayerProgress> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| StoreError::Unparseable(e.to_string()))?;

        let found = value
            .get("appName")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if found != APP_NAME {
            return Err(StoreError::ForeignData {
                expected: APP_NAME.to_string(),
                found: found.to_string(),
            });
        }

        let mut record = validate(merge_with_defaults(&value));
        record.record_session(Utc::now());
        self.persist(&record)?;

        info!(
            "imported progress ({} levels, {} XP)",
            record.levels_completed, record.total_xp
        );
        Ok(record)
    }

    /// Returns a summary of the stored record and backend.
    #[must_use]
    pub fn info(&self) -> StorageInfo {
        let record = self.load();
        let data_size = serde_json::to_string(&record).map_or(0, |s| s.len());

        StorageInfo {
            backend: self.backend.kind(),
            data_size,
            last_played: record.progress.last_played,
            total_sessions: record.progress.total_sessions,
            levels_completed: record.levels_completed,
            total_xp: record.total_xp,
        }
    }

    /// Returns whether any meaningful progress is stored.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.load().has_progress()
    }
}

// ============================================================================
// Tests
// ============================================================================
