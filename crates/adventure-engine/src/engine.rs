//! Level progression state machine and reward evaluation.
//!
//! Per level the states are `Locked`, `Unlocked`, `Completed`. Unlock is
//! derived: level `i` is unlocked iff `i == 0` or `levels_completed >= i`.
//! The only effective transition is `Unlocked -> Completed`, triggered by
//! `complete_level`; completing an already-completed level is a reward
//! no-op, and completing a locked level is rejected so a UI bug cannot
//! silently corrupt the completion counter.

use thiserror::Error;
use tracing::{debug, warn};

use adventure_core::PlayerProgress;
use adventure_store::ProgressStore;

use crate::achievements::{Achievement, AchievementCatalog};
use crate::badges::{Badge, BadgeCatalog};
use crate::levels::{self, LEVEL_COUNT};

/// XP granted for each first-time level completion.
pub const LEVEL_XP: u32 = 100;

/// Errors for invalid progression requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    /// Requested level is beyond the next unlockable one.
    #[error("level {requested} is locked; the next unlockable level is {next}")]
    LevelLocked {
        /// Level the caller asked to complete.
        requested: u32,
        /// Next level that can actually be completed.
        next: u32,
    },

    /// Requested level does not exist.
    #[error("unknown level index {index} (levels are 0..{LEVEL_COUNT})")]
    UnknownLevel {
        /// Offending index.
        index: u32,
    },
}

/// Derived state of a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    /// Not reachable yet.
    Locked,
    /// Reachable, not completed.
    Unlocked,
    /// Completed (terminal).
    Completed,
}

impl LevelState {
    /// Returns display name for the state.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Locked => "Locked",
            Self::Unlocked => "Unlocked",
            Self::Completed => "Completed",
        }
    }
}

/// Result of a completion transition.
#[derive(Debug)]
pub struct CompletionOutcome {
    /// The updated record.
    pub progress: PlayerProgress,
    /// Badges earned by this completion, in award order.
    pub new_badges: Vec<&'static Badge>,
    /// Achievements unlocked by this completion, in sweep order.
    pub new_achievements: Vec<&'static Achievement>,
    /// Whether the updated record was written durably.
    pub persisted: bool,
}

/// Progression rules over a progress record, persisting through an
/// injected store.
pub struct ProgressEngine {
    store: ProgressStore,
    badges: BadgeCatalog,
    achievements: AchievementCatalog,
}

impl ProgressEngine {
    /// Creates an engine over `store` with the built-in catalogs.
    #[must_use]
    pub fn new(store: ProgressStore) -> Self {
        Self::with_catalogs(store, BadgeCatalog::builtin(), AchievementCatalog::builtin())
    }

    /// Creates an engine with explicit catalogs.
    #[must_use]
    pub fn with_catalogs(
        store: ProgressStore,
        badges: BadgeCatalog,
        achievements: AchievementCatalog,
    ) -> Self {
        Self {
            store,
            badges,
            achievements,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Returns the underlying store mutably.
    pub fn store_mut(&mut self) -> &mut ProgressStore {
        &mut self.store
    }

    /// Returns the badge catalog.
    #[must_use]
    pub fn badges(&self) -> &BadgeCatalog {
        &self.badges
    }

    /// Returns the achievement catalog.
    #[must_use]
    pub fn achievements(&self) -> &AchievementCatalog {
        &self.achievements
    }

    /// Returns whether `level_index` is reachable.
    #[must_use]
    pub fn is_unlocked(&self, level_index: u32, progress: &PlayerProgress) -> bool {
        level_index == 0 || progress.levels_completed >= level_index
    }

    /// Returns whether `level_index` has been completed.
    #[must_use]
    pub fn is_completed(&self, level_index: u32, progress: &PlayerProgress) -> bool {
        progress.levels_completed > level_index
    }

    /// Returns the derived state of `level_index`.
    #[must_use]
    pub fn level_state(&self, level_index: u32, progress: &PlayerProgress) -> LevelState {
        if self.is_completed(level_index, progress) {
            LevelState::Completed
        } else if self.is_unlocked(level_index, progress) {
            LevelState::Unlocked
        } else {
            LevelState::Locked
        }
    }

    /// Returns the badge the next unlockable level grants, if any levels
    /// remain.
    #[must_use]
    pub fn next_badge(&self, progress: &PlayerProgress) -> Option<&'static Badge> {
        let lesson = levels::level(progress.levels_completed)?;
        self.badges.get(lesson.badge_id)
    }

    /// Overall completion percentage, rounded to the nearest integer.
    #[must_use]
    pub fn completion_rate(&self, progress: &PlayerProgress) -> u32 {
        (f64::from(progress.levels_completed) / f64::from(LEVEL_COUNT) * 100.0).round() as u32
    }

    /// Resolves the earned badges in unlock order. Ids with no catalog
    /// entry are skipped.
    #[must_use]
    pub fn earned_badges(&self, progress: &PlayerProgress) -> Vec<&'static Badge> {
        progress
            .badges
            .iter()
            .filter_map(|id| self.badges.get(id))
            .collect()
    }

    /// Completes a level.
    ///
    /// First-time completion of the next unlockable level advances the
    /// counter, grants the level XP and badge, sweeps the achievement
    /// catalog against the updated record, and persists through the
    /// store. Completing an already-completed level returns the record
    /// unchanged with empty reward sets; completing a locked level is an
    /// error and nothing is written.
    pub fn complete_level(
        &mut self,
        level_index: u32,
        progress: &PlayerProgress,
    ) -> Result<CompletionOutcome, ProgressError> {
        if level_index >= LEVEL_COUNT {
            return Err(ProgressError::UnknownLevel { index: level_index });
        }

        if level_index > progress.levels_completed {
            return Err(ProgressError::LevelLocked {
                requested: level_index,
                next: progress.levels_completed,
            });
        }

        if level_index < progress.levels_completed {
            debug!("level {level_index} already completed, nothing to award");
            return Ok(CompletionOutcome {
                progress: progress.clone(),
                new_badges: Vec::new(),
                new_achievements: Vec::new(),
                persisted: false,
            });
        }

        let mut updated = progress.clone();
        updated.levels_completed = level_index + 1;
        updated.progress.current_level = level_index;
        updated.total_xp = updated.total_xp.saturating_add(LEVEL_XP);

        let mut new_badges = Vec::new();
        if let Some(lesson) = levels::level(level_index) {
            match self.badges.get(lesson.badge_id) {
                Some(badge) => {
                    if !updated.has_badge(badge.id) {
                        updated.badges.push(badge.id.to_string());
                        new_badges.push(badge);
                        debug!("badge earned: {}", badge.id);
                    }
                }
                // A missing badge never aborts the completion.
                None => warn!("badge not found in catalog: {}", lesson.badge_id),
            }
        }

        let mut new_achievements = Vec::new();
        for achievement in self.achievements.iter() {
            if updated.has_achievement(achievement.id) {
                continue;
            }
            if (achievement.condition)(&updated) {
                updated.achievements.push(achievement.id.to_string());
                updated.total_xp = updated.total_xp.saturating_add(achievement.points);
                new_achievements.push(achievement);
                debug!("achievement unlocked: {}", achievement.id);
            }
        }

        let persisted = self.store.save(&mut updated);

        Ok(CompletionOutcome {
            progress: updated,
            new_badges,
            new_achievements,
            persisted,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
