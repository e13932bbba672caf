//! Advisory auto-save scheduling.
//!
//! Auto-save is an optimization, not a correctness mechanism: the
//! scheduler holds the latest snapshot handed to it and persists it when
//! the caller's event loop ticks past the interval. Dropping a pending
//! snapshot on shutdown is acceptable because every explicit `save()`
//! captures the same state.

use std::time::{Duration, Instant};
use tracing::debug;

use adventure_core::PlayerProgress;

use crate::store::ProgressStore;

/// Default interval between automatic saves.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Minimum interval accepted for automatic saves.
pub const MIN_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);

/// Cooperative auto-save scheduler.
#[derive(Debug)]
pub struct AutoSave {
    enabled: bool,
    interval: Duration,
    pending: Option<PlayerProgress>,
    last_flush: Option<Instant>,
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoSave {
    /// Creates an enabled scheduler with the default interval.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_AUTOSAVE_INTERVAL,
            pending: None,
            last_flush: None,
        }
    }

    /// Sets the flush interval, clamped to the minimum.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_AUTOSAVE_INTERVAL);
        self
    }

    /// Returns whether scheduling is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables scheduling. Disabling drops any pending
    /// snapshot.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.pending = None;
        }
    }

    /// Returns whether a snapshot is waiting to be flushed.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Remembers the latest snapshot for the next flush. Earlier pending
    /// snapshots are superseded.
    pub fn schedule(&mut self, record: &PlayerProgress) {
        if self.enabled {
            self.pending = Some(record.clone());
        }
    }

    /// Flushes the pending snapshot if the interval has elapsed.
    ///
    /// Returns `None` when nothing was due, otherwise the save result.
    pub fn flush_due(&mut self, store: &mut ProgressStore, now: Instant) -> Option<bool> {
        if !self.enabled || self.pending.is_none() {
            return None;
        }

        let due = self
            .last_flush
            .map_or(true, |last| now.duration_since(last) >= self.interval);
        if !due {
            return None;
        }

        self.last_flush = Some(now);
        Some(self.flush(store))
    }

    /// Persists the pending snapshot immediately, if any.
    pub fn flush(&mut self, store: &mut ProgressStore) -> bool {
        match self.pending.take() {
            Some(mut record) => {
                debug!("flushing auto-save snapshot");
                store.save(&mut record)
            }
            None => true,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
