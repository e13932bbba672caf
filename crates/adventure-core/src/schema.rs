//! Schema reconciliation and validation for the progress record.
//!
//! Loaded data may come from an older release of the app, a hand-edited
//! export, or a partially corrupted slot. Reconciliation is a total,
//! field-by-field merge against the typed defaults over a closed set of
//! fields: present well-typed values override the default, nested objects
//! merge key-by-key, everything else keeps the default. Validation then
//! clamps ranges and deduplicates reward lists; it is idempotent.

use chrono::DateTime;
use serde_json::Value;

use crate::player::{AnimationSpeed, PlayerProgress, LEVEL_COUNT};

/// Schema version written into backups and exports.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Application tag used as an import-time sanity check.
pub const APP_NAME: &str = "Arduino Adventure";

// ============================================================================
// Field extraction helpers
// ============================================================================

fn bool_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

fn u32_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn u64_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<u64> {
    obj.get(key).and_then(Value::as_u64)
}

fn f64_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Collects the string elements of an array field, skipping anything else.
fn id_list_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = obj.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

// ============================================================================
// Merge with defaults
// ============================================================================

/// Reconciles loaded JSON with the current schema defaults.
///
/// Total function: any shape of input yields a usable record. Fields the
/// schema does not know are ignored; fields with an unexpected JSON type
/// keep their default.
#[must_use]
pub fn merge_with_defaults(loaded: &Value) -> PlayerProgress {
    let mut record = PlayerProgress::default();

    let Some(obj) = loaded.as_object() else {
        return record;
    };

    if let Some(name) = string_field(obj, "name") {
        record.name = name;
    }
    if let Some(xp) = u32_field(obj, "totalXP") {
        record.total_xp = xp;
    }
    if let Some(completed) = u32_field(obj, "levelsCompleted") {
        record.levels_completed = completed;
    }
    if let Some(badges) = id_list_field(obj, "badges") {
        record.badges = badges;
    }
    if let Some(achievements) = id_list_field(obj, "achievements") {
        record.achievements = achievements;
    }

    if let Some(settings) = obj.get("settings").and_then(Value::as_object) {
        if let Some(sound) = bool_field(settings, "sound") {
            record.settings.sound = sound;
        }
        if let Some(voice) = bool_field(settings, "voice") {
            record.settings.voice = voice;
        }
        if let Some(speed) = string_field(settings, "animationSpeed")
            .as_deref()
            .and_then(AnimationSpeed::from_name)
        {
            record.settings.animation_speed = speed;
        }
        if let Some(language) = string_field(settings, "language") {
            record.settings.language = language;
        }
        if let Some(difficulty) = string_field(settings, "difficulty") {
            record.settings.difficulty = difficulty;
        }
    }

    if let Some(progress) = obj.get("progress").and_then(Value::as_object) {
        if let Some(level) = u32_field(progress, "currentLevel") {
            record.progress.current_level = level;
        }
        if let Some(time) = u64_field(progress, "timeSpent") {
            record.progress.time_spent = time;
        }
        if let Some(played) = progress.get("lastPlayed").and_then(Value::as_str) {
            if let Ok(ts) = DateTime::parse_from_rfc3339(played) {
                record.progress.last_played = Some(ts.to_utc());
            }
        }
        if let Some(streak) = u32_field(progress, "streakDays") {
            record.progress.streak_days = streak;
        }
        if let Some(sessions) = u32_field(progress, "totalSessions") {
            record.progress.total_sessions = sessions;
        }
    }

    if let Some(statistics) = obj.get("statistics").and_then(Value::as_object) {
        if let Some(hints) = u32_field(statistics, "hintsUsed") {
            record.statistics.hints_used = hints;
        }
        if let Some(errors) = u32_field(statistics, "errorsCount") {
            record.statistics.errors_count = errors;
        }
        if let Some(average) = f64_field(statistics, "averageTime") {
            record.statistics.average_time = average;
        }
        if let Some(favorite) = u32_field(statistics, "favoriteLevel") {
            record.statistics.favorite_level = Some(favorite);
        }
        if let Some(rate) = f64_field(statistics, "completionRate") {
            record.statistics.completion_rate = rate as f32;
        }
    }

    if let Some(preferences) = obj.get("preferences").and_then(Value::as_object) {
        if let Some(rubi) = bool_field(preferences, "rubiEnabled") {
            record.preferences.rubi_enabled = rubi;
        }
        if let Some(animations) = bool_field(preferences, "showAnimations") {
            record.preferences.show_animations = animations;
        }
        if let Some(auto_save) = bool_field(preferences, "autoSave") {
            record.preferences.auto_save = auto_save;
        }
        if let Some(cloud) = bool_field(preferences, "saveToCloud") {
            record.preferences.save_to_cloud = cloud;
        }
    }

    record
}

// ============================================================================
// Validation
// ============================================================================

/// Validates a record, returning the corrected copy.
///
/// Clamps counters into their documented ranges and deduplicates the
/// reward lists while preserving first-occurrence order. Applying this
/// twice yields the same record as applying it once.
#[must_use]
pub fn validate(mut record: PlayerProgress) -> PlayerProgress {
    record.levels_completed = record.levels_completed.min(LEVEL_COUNT);
    record.progress.current_level = record.progress.current_level.min(LEVEL_COUNT - 1);

    if let Some(favorite) = record.statistics.favorite_level {
        if favorite >= LEVEL_COUNT {
            record.statistics.favorite_level = None;
        }
    }

    if !record.statistics.average_time.is_finite() || record.statistics.average_time < 0.0 {
        record.statistics.average_time = 0.0;
    }
    if !record.statistics.completion_rate.is_finite() {
        record.statistics.completion_rate = 0.0;
    }
    record.statistics.completion_rate = record.statistics.completion_rate.clamp(0.0, 100.0);

    dedup_preserving_order(&mut record.badges);
    dedup_preserving_order(&mut record.achievements);

    record
}

/// Removes duplicate ids, keeping the first occurrence of each.
fn dedup_preserving_order(ids: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(ids.len());
    ids.retain(|id| {
        if seen.contains(id) {
            false
        } else {
            seen.push(id.clone());
            true
        }
    });
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Preferences, Settings};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_merge_empty_object_yields_defaults() {
        let record = merge_with_defaults(&json!({}));
        assert_eq!(record, PlayerProgress::default());
    }

    #[test]
    fn test_merge_non_object_yields_defaults() {
        assert_eq!(merge_with_defaults(&json!(null)), PlayerProgress::default());
        assert_eq!(merge_with_defaults(&json!([1, 2])), PlayerProgress::default());
        assert_eq!(merge_with_defaults(&json!("junk")), PlayerProgress::default());
    }

    #[test]
    fn test_merge_preserves_present_fields() {
        let record = merge_with_defaults(&json!({
            "name": "Ada",
            "totalXP": 350,
            "levelsCompleted": 3,
            "badges": ["explorer", "light-beginner"],
            "achievements": ["first-steps"],
        }));

        assert_eq!(record.name, "Ada");
        assert_eq!(record.total_xp, 350);
        assert_eq!(record.levels_completed, 3);
        assert_eq!(record.badges, vec!["explorer", "light-beginner"]);
        assert_eq!(record.achievements, vec!["first-steps"]);
        // Missing sections appear with defaults.
        assert_eq!(record.settings, Settings::default());
        assert_eq!(record.preferences, Preferences::default());
    }

    #[test]
    fn test_merge_nested_objects_key_by_key() {
        // An old save that predates `difficulty` and the whole
        // `preferences` section.
        let record = merge_with_defaults(&json!({
            "settings": { "sound": false, "animationSpeed": "fast" },
        }));

        assert!(!record.settings.sound);
        assert_eq!(record.settings.animation_speed, AnimationSpeed::Fast);
        // Untouched keys of the same section keep their defaults.
        assert!(record.settings.voice);
        assert_eq!(record.settings.difficulty, "normal");
        assert_eq!(record.preferences, Preferences::default());
    }

    #[test]
    fn test_merge_skips_ill_typed_fields() {
        let record = merge_with_defaults(&json!({
            "totalXP": "lots",
            "levelsCompleted": -4,
            "badges": "explorer",
            "settings": { "sound": "yes" },
        }));

        assert_eq!(record.total_xp, 0);
        assert_eq!(record.levels_completed, 0);
        assert!(record.badges.is_empty());
        assert!(record.settings.sound);
    }

    #[test]
    fn test_merge_parses_last_played_timestamp() {
        let record = merge_with_defaults(&json!({
            "progress": { "lastPlayed": "2024-03-01T18:30:00Z", "totalSessions": 7 },
        }));

        assert_eq!(record.progress.total_sessions, 7);
        let played = record.progress.last_played.expect("timestamp");
        assert_eq!(played.to_rfc3339(), "2024-03-01T18:30:00+00:00");

        let bad = merge_with_defaults(&json!({
            "progress": { "lastPlayed": "yesterday-ish" },
        }));
        assert!(bad.progress.last_played.is_none());
    }

    #[test]
    fn test_merge_ignores_unknown_keys() {
        let record = merge_with_defaults(&json!({
            "totalXP": 100,
            "telemetry": { "clicks": 9000 },
        }));
        assert_eq!(record.total_xp, 100);
    }

    #[test]
    fn test_validate_clamps_levels_completed() {
        let mut record = PlayerProgress::default();
        record.levels_completed = 99;
        record.progress.current_level = 99;

        let validated = validate(record);
        assert_eq!(validated.levels_completed, LEVEL_COUNT);
        assert_eq!(validated.progress.current_level, LEVEL_COUNT - 1);
    }

    #[test]
    fn test_validate_fixes_statistics() {
        let mut record = PlayerProgress::default();
        record.statistics.average_time = -3.0;
        record.statistics.completion_rate = 250.0;
        record.statistics.favorite_level = Some(40);

        let validated = validate(record);
        assert_eq!(validated.statistics.average_time, 0.0);
        assert_eq!(validated.statistics.completion_rate, 100.0);
        assert!(validated.statistics.favorite_level.is_none());
    }

    #[test]
    fn test_validate_deduplicates_rewards() {
        let mut record = PlayerProgress::default();
        record.badges = vec![
            "explorer".to_string(),
            "musician".to_string(),
            "explorer".to_string(),
        ];
        record.achievements = vec!["first-steps".to_string(), "first-steps".to_string()];

        let validated = validate(record);
        assert_eq!(validated.badges, vec!["explorer", "musician"]);
        assert_eq!(validated.achievements, vec!["first-steps"]);
    }

    fn id_vec() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::sample::select(vec![
                "explorer".to_string(),
                "light-beginner".to_string(),
                "musician".to_string(),
                "detective".to_string(),
                "first-steps".to_string(),
                "collector".to_string(),
            ]),
            0..8,
        )
    }

    fn arb_record() -> impl Strategy<Value = PlayerProgress> {
        (
            any::<u32>(),
            0u32..64,
            id_vec(),
            id_vec(),
            any::<f64>(),
            any::<f32>(),
            prop::option::of(0u32..64),
        )
            .prop_map(
                |(xp, completed, badges, achievements, average, rate, favorite)| {
                    let mut record = PlayerProgress::default();
                    record.total_xp = xp;
                    record.levels_completed = completed;
                    record.badges = badges;
                    record.achievements = achievements;
                    record.statistics.average_time = average;
                    record.statistics.completion_rate = rate;
                    record.statistics.favorite_level = favorite;
                    record
                },
            )
    }

    proptest! {
        #[test]
        fn prop_validate_is_idempotent(record in arb_record()) {
            let once = validate(record);
            let twice = validate(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_validate_respects_bounds(record in arb_record()) {
            let validated = validate(record);
            prop_assert!(validated.levels_completed <= LEVEL_COUNT);
            prop_assert!(validated.statistics.completion_rate >= 0.0);
            prop_assert!(validated.statistics.completion_rate <= 100.0);
        }

        #[test]
        fn prop_merge_round_trips_validated_records(record in arb_record()) {
            let validated = validate(record);
            let value = serde_json::to_value(&validated).expect("serialize");
            prop_assert_eq!(merge_with_defaults(&value), validated);
        }
    }
}
