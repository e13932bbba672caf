//! Achievement catalog.
//!
//! Achievements are cross-cutting milestones, independent of any single
//! lesson. Each entry carries a pure predicate over the whole progress
//! record; the engine sweeps the catalog in definition order after every
//! completion.

use adventure_core::PlayerProgress;

/// Pure unlock predicate over the progress record.
pub type Condition = fn(&PlayerProgress) -> bool;

/// A milestone definition.
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    /// Stable identifier stored in the progress record.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Unlock description.
    pub description: &'static str,
    /// Unlock predicate.
    pub condition: Condition,
    /// XP granted on unlock.
    pub points: u32,
}

/// The built-in milestone definitions, in sweep order.
pub const BUILTIN_ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first-steps",
        name: "First Steps",
        description: "Complete your first level",
        condition: |record| record.levels_completed >= 1,
        points: 50,
    },
    Achievement {
        id: "fast-learner",
        name: "Fast Learner",
        description: "Complete 5 levels in one session",
        condition: |record| record.levels_completed >= 5,
        points: 100,
    },
    Achievement {
        id: "perfectionist",
        name: "Perfectionist",
        description: "Complete a level without using hints",
        condition: |record| record.statistics.hints_used == 0 && record.levels_completed > 0,
        points: 75,
    },
    Achievement {
        id: "collector",
        name: "Badge Collector",
        description: "Earn 10 different badges",
        condition: |record| record.badges.len() >= 10,
        points: 150,
    },
    Achievement {
        id: "arduino-hero",
        name: "Arduino Hero",
        description: "Complete all 20 levels",
        condition: |record| record.levels_completed >= 20,
        points: 500,
    },
];

/// Static achievement catalog. Iteration order is definition order and
/// stable across runs.
#[derive(Debug, Clone, Copy)]
pub struct AchievementCatalog {
    achievements: &'static [Achievement],
}

impl Default for AchievementCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AchievementCatalog {
    /// Returns the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            achievements: BUILTIN_ACHIEVEMENTS,
        }
    }

    /// Creates a catalog over custom definitions.
    #[must_use]
    pub fn new(achievements: &'static [Achievement]) -> Self {
        Self { achievements }
    }

    /// Looks up a milestone by id.
    #[must_use]
    pub fn get(&self, achievement_id: &str) -> Option<&'static Achievement> {
        self.achievements.iter().find(|a| a.id == achievement_id)
    }

    /// Iterates over all definitions in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = &'static Achievement> {
        self.achievements.iter()
    }

    /// Number of milestone definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_on_fresh_record() {
        let record = PlayerProgress::default();
        let catalog = AchievementCatalog::builtin();

        for achievement in catalog.iter() {
            assert!(
                !(achievement.condition)(&record),
                "{} should not unlock on a fresh record",
                achievement.id
            );
        }
    }

    #[test]
    fn test_first_steps_condition() {
        let catalog = AchievementCatalog::builtin();
        let first_steps = catalog.get("first-steps").expect("definition");

        let mut record = PlayerProgress::default();
        record.levels_completed = 1;
        assert!((first_steps.condition)(&record));
    }

    #[test]
    fn test_perfectionist_requires_no_hints() {
        let catalog = AchievementCatalog::builtin();
        let perfectionist = catalog.get("perfectionist").expect("definition");

        let mut record = PlayerProgress::default();
        record.levels_completed = 3;
        assert!((perfectionist.condition)(&record));

        record.record_hint();
        assert!(!(perfectionist.condition)(&record));
    }

    #[test]
    fn test_collector_counts_badges() {
        let catalog = AchievementCatalog::builtin();
        let collector = catalog.get("collector").expect("definition");

        let mut record = PlayerProgress::default();
        record.badges = (0..9).map(|i| format!("badge-{i}")).collect();
        assert!(!(collector.condition)(&record));

        record.badges.push("badge-9".to_string());
        assert!((collector.condition)(&record));
    }

    #[test]
    fn test_arduino_hero_threshold() {
        let catalog = AchievementCatalog::builtin();
        let hero = catalog.get("arduino-hero").expect("definition");

        let mut record = PlayerProgress::default();
        record.levels_completed = 19;
        assert!(!(hero.condition)(&record));

        record.levels_completed = 20;
        assert!((hero.condition)(&record));
    }

    #[test]
    fn test_sweep_order_is_definition_order() {
        let ids: Vec<&str> = AchievementCatalog::builtin().iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            vec![
                "first-steps",
                "fast-learner",
                "perfectionist",
                "collector",
                "arduino-hero"
            ]
        );
    }
}
