// ABOUTME: Classifies a day's activities into none, aerobic, anaerobic or both
// ABOUTME: Uses activity type keyword matching and minimum session durations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use crate::constants::training::{
    AEROBIC_MIN_DURATION_SECS, AEROBIC_TYPES, STRENGTH_MIN_DURATION_SECS, STRENGTH_TYPES,
};
use crate::models::{Activity, TrainingType};

fn type_matches(activity_type: &str, keywords: &[&str]) -> bool {
    let lowered = activity_type.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// Derive the day's training type
///
/// An activity counts as aerobic when its type contains an aerobic keyword and
/// it lasted at least 30 minutes; as strength work when its type contains a
/// strength keyword and it lasted at least 40 minutes. Garmin reports variants
/// like `trail_running` or `indoor_cycling`, hence substring matching.
#[must_use]
pub fn classify(activities: &[Activity]) -> TrainingType {
    let aerobic = activities.iter().any(|a| {
        a.duration_secs >= AEROBIC_MIN_DURATION_SECS && type_matches(&a.activity_type, AEROBIC_TYPES)
    });
    let anaerobic = activities.iter().any(|a| {
        a.duration_secs >= STRENGTH_MIN_DURATION_SECS
            && type_matches(&a.activity_type, STRENGTH_TYPES)
    });

    TrainingType::from_flags(aerobic, anaerobic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(activity_type: &str, minutes: f64) -> Activity {
        Activity {
            name: activity_type.to_owned(),
            activity_type: activity_type.to_owned(),
            duration_secs: minutes * 60.0,
            ..Activity::default()
        }
    }

    #[test]
    fn test_long_run_is_aerobic() {
        assert_eq!(classify(&[activity("running", 35.0)]), TrainingType::Aerobic);
    }

    #[test]
    fn test_short_run_is_none() {
        assert_eq!(classify(&[activity("running", 20.0)]), TrainingType::None);
    }

    #[test]
    fn test_run_and_strength_is_both() {
        let day = [activity("running", 35.0), activity("strength", 45.0)];
        assert_eq!(classify(&day), TrainingType::Both);
    }

    #[test]
    fn test_strength_threshold_is_forty_minutes() {
        assert_eq!(
            classify(&[activity("strength_training", 39.0)]),
            TrainingType::None
        );
        assert_eq!(
            classify(&[activity("strength_training", 40.0)]),
            TrainingType::Anaerobic
        );
    }

    #[test]
    fn test_type_variants_and_case() {
        assert_eq!(
            classify(&[activity("Indoor_Cycling", 45.0)]),
            TrainingType::Aerobic
        );
        assert_eq!(classify(&[activity("yoga", 90.0)]), TrainingType::None);
        assert_eq!(classify(&[]), TrainingType::None);
    }
}
