//! Player progress tracking.
//!
//! This module provides the single persisted aggregate for a player:
//! - XP and sequential level completion
//! - Earned badges and achievements (insertion order = unlock order)
//! - Settings, session progress, statistics, and presentation preferences
//!
//! Unlock state per level is always derived from `levels_completed`; it is
//! never stored as an independent flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Total number of lessons in the fixed sequence (level indices 0..=20).
pub const LEVEL_COUNT: u32 = 21;

// ============================================================================
// Settings
// ============================================================================

/// Playback speed for UI animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    /// Slowed down animations.
    Slow,
    /// Default speed.
    #[default]
    Normal,
    /// Sped up animations.
    Fast,
}

impl AnimationSpeed {
    /// Parses a speed from its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "slow" => Some(Self::Slow),
            "normal" => Some(Self::Normal),
            "fast" => Some(Self::Fast),
            _ => None,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }
}

/// User-facing settings stored with the progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Sound effects enabled.
    pub sound: bool,
    /// Spoken feedback enabled.
    pub voice: bool,
    /// UI animation speed.
    pub animation_speed: AnimationSpeed,
    /// UI language code.
    pub language: String,
    /// Difficulty label.
    pub difficulty: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            voice: true,
            animation_speed: AnimationSpeed::Normal,
            language: "en".to_string(),
            difficulty: "normal".to_string(),
        }
    }
}

// ============================================================================
// Session progress
// ============================================================================

/// Session-level progress counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionProgress {
    /// Level the player last interacted with.
    pub current_level: u32,
    /// Accumulated play time in seconds.
    pub time_spent: u64,
    /// Timestamp of the last persisted session, if any.
    pub last_played: Option<DateTime<Utc>>,
    /// Consecutive calendar days with a session.
    pub streak_days: u32,
    /// Total number of persisted sessions.
    pub total_sessions: u32,
}

// ============================================================================
// Statistics
// ============================================================================

/// Aggregate play statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    /// Total hints requested.
    pub hints_used: u32,
    /// Total mistakes recorded.
    pub errors_count: u32,
    /// Average time per level in seconds.
    pub average_time: f64,
    /// Level the player revisited the most, if known.
    pub favorite_level: Option<u32>,
    /// Cached completion percentage (0-100).
    pub completion_rate: f32,
}

// ============================================================================
// Preferences
// ============================================================================

/// Presentation hints; none of these affect progression rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Whether the Rubi assistant is shown.
    pub rubi_enabled: bool,
    /// Whether UI animations play.
    pub show_animations: bool,
    /// Whether auto-save is scheduled.
    pub auto_save: bool,
    /// Whether the player opted into cloud sync.
    pub save_to_cloud: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            rubi_enabled: true,
            show_animations: true,
            auto_save: true,
            save_to_cloud: false,
        }
    }
}

// ============================================================================
// Player progress aggregate
// ============================================================================

/// Complete player progress record.
///
/// This is the only aggregate the store persists. Badge and achievement
/// ids reference the static catalogs; their order is unlock order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProgress {
    /// Display name; empty is allowed.
    pub name: String,
    /// Accumulated experience points.
    #[serde(rename = "totalXP")]
    pub total_xp: u32,
    /// Count of levels completed in strict sequence. Doubles as the index
    /// of the next unlockable level.
    pub levels_completed: u32,
    /// Earned badge ids, unique, in unlock order.
    pub badges: Vec<String>,
    /// Earned achievement ids, unique, in unlock order.
    pub achievements: Vec<String>,
    /// User settings.
    pub settings: Settings,
    /// Session counters.
    pub progress: SessionProgress,
    /// Play statistics.
    pub statistics: Statistics,
    /// Presentation preferences.
    pub preferences: Preferences,
}

impl PlayerProgress {
    /// Creates a fresh record with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns whether any progress has been made.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.levels_completed > 0 || self.total_xp > 0
    }

    /// Returns whether a badge id has been earned.
    #[must_use]
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|id| id == badge_id)
    }

    /// Returns whether an achievement id has been unlocked.
    #[must_use]
    pub fn has_achievement(&self, achievement_id: &str) -> bool {
        self.achievements.iter().any(|id| id == achievement_id)
    }

    /// Records a hint request.
    pub fn record_hint(&mut self) {
        self.statistics.hints_used = self.statistics.hints_used.saturating_add(1);
    }

    /// Records a mistake.
    pub fn record_error(&mut self) {
        self.statistics.errors_count = self.statistics.errors_count.saturating_add(1);
    }

    /// Records additional play time.
    pub fn record_time(&mut self, seconds: u64) {
        self.progress.time_spent = self.progress.time_spent.saturating_add(seconds);
    }

    /// Stamps a persisted session: updates `last_played`, bumps the
    /// session counter, and maintains the consecutive-day streak.
    pub fn record_session(&mut self, now: DateTime<Utc>) {
        let previous = self.progress.last_played;
        self.progress.total_sessions = self.progress.total_sessions.saturating_add(1);
        self.progress.last_played = Some(now);

        self.progress.streak_days = match previous {
            None => 1,
            Some(prev) => {
                let days = now
                    .date_naive()
                    .signed_duration_since(prev.date_naive())
                    .num_days();
                match days {
                    0 => self.progress.streak_days.max(1),
                    1 => self.progress.streak_days.saturating_add(1),
                    _ => 1,
                }
            }
        };
    }
}

// ============================================================================
// Tests
// ============================================================================
