//! The fixed lesson sequence.
//!
//! Lesson content (steps, quizzes, wiring diagrams) is presentation data
//! and lives outside this core. The table here carries what the rules
//! need: the order of the lessons and which badge each one grants.

pub use adventure_core::LEVEL_COUNT;

/// One lesson in the fixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    /// Position in the sequence (0-based).
    pub index: u32,
    /// Lesson title.
    pub title: &'static str,
    /// Badge granted on completion.
    pub badge_id: &'static str,
}

/// All 21 lessons in order.
pub const LEVELS: [Level; LEVEL_COUNT as usize] = [
    Level { index: 0, title: "Getting Started", badge_id: "explorer" },
    Level { index: 1, title: "Hello Arduino!", badge_id: "light-beginner" },
    Level { index: 2, title: "Beep Beep", badge_id: "sound-scout" },
    Level { index: 3, title: "Colorful Disco", badge_id: "disco-maker" },
    Level { index: 4, title: "Repeat It", badge_id: "code-wizard" },
    Level { index: 5, title: "Push It", badge_id: "button-master" },
    Level { index: 6, title: "Piano", badge_id: "musician" },
    Level { index: 7, title: "Knob", badge_id: "control-captain" },
    Level { index: 8, title: "Control the Lights", badge_id: "light-engineer" },
    Level { index: 9, title: "Control the Temperature", badge_id: "weather-watcher" },
    Level { index: 10, title: "Display Numbers", badge_id: "number-genius" },
    Level { index: 11, title: "Let's Count", badge_id: "counter-pro" },
    Level { index: 12, title: "Simon Says", badge_id: "game-coder" },
    Level { index: 13, title: "Jump / Catch the Thief", badge_id: "detective" },
    Level { index: 14, title: "Become an Artist", badge_id: "creative-coder" },
    Level { index: 15, title: "Video Game", badge_id: "game-designer" },
    Level { index: 16, title: "Smart Home", badge_id: "smart-builder" },
    Level { index: 17, title: "Greenhouse", badge_id: "eco-hero" },
    Level { index: 18, title: "Speech Recognition (AI)", badge_id: "ai-explorer" },
    Level { index: 19, title: "Science Experiment", badge_id: "science-seeker" },
    Level { index: 20, title: "Theremin", badge_id: "sound-magician" },
];

/// Looks up a level by index.
#[must_use]
pub fn level(index: u32) -> Option<&'static Level> {
    LEVELS.get(index as usize)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_level_count() {
        assert_eq!(LEVELS.len(), LEVEL_COUNT as usize);
    }

    #[test]
    fn test_indices_are_sequential() {
        for (position, lesson) in LEVELS.iter().enumerate() {
            assert_eq!(lesson.index as usize, position);
        }
    }

    #[test]
    fn test_badge_ids_are_unique() {
        for (i, a) in LEVELS.iter().enumerate() {
            for b in &LEVELS[i + 1..] {
                assert_ne!(a.badge_id, b.badge_id);
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(level(0).map(|l| l.badge_id), Some("explorer"));
        assert_eq!(level(20).map(|l| l.badge_id), Some("sound-magician"));
        assert!(level(21).is_none());
    }
}
