//! Badge catalog.
//!
//! One collectible badge per lesson. The catalog is static and immutable;
//! the progress record stores only badge ids.

/// Badge rarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    /// Early-lesson badges.
    Common,
    /// Mid-sequence badges.
    Uncommon,
    /// Harder project badges.
    Rare,
    /// Capstone project badges.
    Epic,
    /// Final-stretch badges.
    Legendary,
}

impl Rarity {
    /// Returns display name for the rarity.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

/// A collectible badge definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    /// Stable identifier stored in the progress record.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Icon class used by the presentation layer.
    pub icon: &'static str,
    /// Unlock flavor text.
    pub description: &'static str,
    /// Accent color (hex).
    pub color: &'static str,
    /// Rarity tier.
    pub rarity: Rarity,
}

/// The built-in badge definitions, one per lesson, in lesson order.
pub const BUILTIN_BADGES: &[Badge] = &[
    Badge {
        id: "explorer",
        name: "Explorer Badge",
        icon: "fas fa-compass",
        description: "You've started your Arduino journey!",
        color: "#4A90E2",
        rarity: Rarity::Common,
    },
    Badge {
        id: "light-beginner",
        name: "Light Beginner",
        icon: "fas fa-lightbulb",
        description: "You made your first LED blink!",
        color: "#F5A623",
        rarity: Rarity::Common,
    },
    Badge {
        id: "sound-scout",
        name: "Sound Scout",
        icon: "fas fa-volume-up",
        description: "You mastered the art of Arduino sounds!",
        color: "#7ED321",
        rarity: Rarity::Common,
    },
    Badge {
        id: "disco-maker",
        name: "Disco Maker",
        icon: "fas fa-palette",
        description: "You created an amazing light show!",
        color: "#E91E63",
        rarity: Rarity::Uncommon,
    },
    Badge {
        id: "code-wizard",
        name: "Code Wizard",
        icon: "fas fa-magic",
        description: "You mastered the power of loops!",
        color: "#9013FE",
        rarity: Rarity::Uncommon,
    },
    Badge {
        id: "button-master",
        name: "Button Master",
        icon: "fas fa-hand-pointer",
        description: "You learned to control with buttons!",
        color: "#4A90E2",
        rarity: Rarity::Common,
    },
    Badge {
        id: "musician",
        name: "Musician",
        icon: "fas fa-music",
        description: "You created your own Arduino piano!",
        color: "#FF6B35",
        rarity: Rarity::Uncommon,
    },
    Badge {
        id: "control-captain",
        name: "Control Captain",
        icon: "fas fa-sliders-h",
        description: "You mastered analog input controls!",
        color: "#4ECDC4",
        rarity: Rarity::Uncommon,
    },
    Badge {
        id: "light-engineer",
        name: "Light Engineer",
        icon: "fas fa-adjust",
        description: "You learned to control light intensity!",
        color: "#F5A623",
        rarity: Rarity::Uncommon,
    },
    Badge {
        id: "weather-watcher",
        name: "Weather Watcher",
        icon: "fas fa-cloud-sun",
        description: "You created a temperature-reactive system!",
        color: "#45B7D1",
        rarity: Rarity::Rare,
    },
    Badge {
        id: "number-genius",
        name: "Number Genius",
        icon: "fas fa-calculator",
        description: "You mastered digital number displays!",
        color: "#96CEB4",
        rarity: Rarity::Uncommon,
    },
    Badge {
        id: "counter-pro",
        name: "Counter Pro",
        icon: "fas fa-plus-circle",
        description: "You became an expert at counting!",
        color: "#FFEAA7",
        rarity: Rarity::Uncommon,
    },
    Badge {
        id: "game-coder",
        name: "Game Coder",
        icon: "fas fa-gamepad",
        description: "You built your own memory game!",
        color: "#A29BFE",
        rarity: Rarity::Rare,
    },
    Badge {
        id: "detective",
        name: "Detective",
        icon: "fas fa-search",
        description: "You caught the thief with touch control!",
        color: "#6C5CE7",
        rarity: Rarity::Rare,
    },
    Badge {
        id: "creative-coder",
        name: "Creative Coder",
        icon: "fas fa-paint-brush",
        description: "You created art with code!",
        color: "#FD79A8",
        rarity: Rarity::Rare,
    },
    Badge {
        id: "game-designer",
        name: "Game Designer",
        icon: "fas fa-trophy",
        description: "You built your own video game!",
        color: "#FDCB6E",
        rarity: Rarity::Epic,
    },
    Badge {
        id: "smart-builder",
        name: "Smart Builder",
        icon: "fas fa-home",
        description: "You built a smart home system!",
        color: "#00B894",
        rarity: Rarity::Rare,
    },
    Badge {
        id: "eco-hero",
        name: "Eco Hero",
        icon: "fas fa-leaf",
        description: "You built an automated greenhouse!",
        color: "#00CEC9",
        rarity: Rarity::Epic,
    },
    Badge {
        id: "ai-explorer",
        name: "AI Explorer",
        icon: "fas fa-brain",
        description: "You built a voice-controlled system!",
        color: "#E17055",
        rarity: Rarity::Legendary,
    },
    Badge {
        id: "science-seeker",
        name: "Science Seeker",
        icon: "fas fa-flask",
        description: "You conducted amazing sensor experiments!",
        color: "#81ECEC",
        rarity: Rarity::Epic,
    },
    Badge {
        id: "sound-magician",
        name: "Sound Magician",
        icon: "fas fa-magic",
        description: "You mastered the magical theremin!",
        color: "#A29BFE",
        rarity: Rarity::Legendary,
    },
];

/// Static badge catalog.
#[derive(Debug, Clone, Copy)]
pub struct BadgeCatalog {
    badges: &'static [Badge],
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BadgeCatalog {
    /// Returns the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            badges: BUILTIN_BADGES,
        }
    }

    /// Creates a catalog over custom definitions.
    #[must_use]
    pub fn new(badges: &'static [Badge]) -> Self {
        Self { badges }
    }

    /// Looks up a badge by id.
    #[must_use]
    pub fn get(&self, badge_id: &str) -> Option<&'static Badge> {
        self.badges.iter().find(|badge| badge.id == badge_id)
    }

    /// Iterates over all badge definitions.
    pub fn iter(&self) -> impl Iterator<Item = &'static Badge> {
        self.badges.iter()
    }

    /// Number of badge definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.badges.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LEVELS;

    #[test]
    fn test_catalog_has_one_badge_per_level() {
        let catalog = BadgeCatalog::builtin();
        assert_eq!(catalog.len(), LEVELS.len());
    }

    #[test]
    fn test_every_level_badge_resolves() {
        let catalog = BadgeCatalog::builtin();
        for lesson in &LEVELS {
            assert!(
                catalog.get(lesson.badge_id).is_some(),
                "no badge definition for {}",
                lesson.badge_id
            );
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let catalog = BadgeCatalog::builtin();
        for (i, a) in catalog.iter().enumerate() {
            for b in BUILTIN_BADGES[i + 1..].iter() {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_lookup_miss() {
        assert!(BadgeCatalog::builtin().get("no-such-badge").is_none());
    }

    #[test]
    fn test_rarity_display_names() {
        assert_eq!(Rarity::Common.display_name(), "Common");
        assert_eq!(Rarity::Legendary.display_name(), "Legendary");
    }
}
