// ABOUTME: Canonical per-day health record built from Garmin Connect payloads
// ABOUTME: DayRecord, Activity, HeartRate, SleepMetrics, BodyComposition and TrainingType
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Training performed on a day, derived from its activities
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrainingType {
    /// No qualifying session
    #[default]
    None,
    /// Qualifying aerobic session only
    #[serde(alias = "A")]
    Aerobic,
    /// Qualifying strength session only
    #[serde(alias = "S")]
    Anaerobic,
    /// Both aerobic and strength sessions
    Both,
}

impl TrainingType {
    /// Combine the two training flags into a tag
    #[must_use]
    pub const fn from_flags(aerobic: bool, anaerobic: bool) -> Self {
        match (aerobic, anaerobic) {
            (true, true) => Self::Both,
            (true, false) => Self::Aerobic,
            (false, true) => Self::Anaerobic,
            (false, false) => Self::None,
        }
    }

    /// Stable string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Aerobic => "aerobic",
            Self::Anaerobic => "anaerobic",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for TrainingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded workout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Provider activity id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Activity name as entered on the device
    pub name: String,
    /// Provider type key (`running`, `strength_training`, ...)
    pub activity_type: String,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Calories burned
    pub calories: f64,
    /// Distance in meters
    pub distance_meters: f64,
    /// Average heart rate (bpm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<u32>,
    /// Maximum heart rate (bpm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<u32>,
    /// Local start time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_local: Option<NaiveDateTime>,
}

/// Heart-rate summary for a day (bpm, 0 when unknown)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeartRate {
    /// Resting heart rate
    pub resting: u32,
    /// Average heart rate
    pub average: u32,
    /// Maximum heart rate
    pub max: u32,
}

/// Seconds spent in each sleep stage
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SleepMetrics {
    /// Deep sleep
    pub deep_secs: u64,
    /// Light sleep
    pub light_secs: u64,
    /// REM sleep
    pub rem_secs: u64,
    /// Awake time
    pub awake_secs: u64,
    /// Total sleep time
    pub total_secs: u64,
}

/// Body composition measurement (weight in kg, fat and water in percent)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BodyComposition {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Body fat percentage
    pub body_fat_percent: f64,
    /// Body water percentage
    pub body_water_percent: f64,
    /// Muscle mass in kilograms
    pub muscle_mass_kg: f64,
}

/// Canonical normalized snapshot of one day of Garmin data
///
/// Replaced as a whole on every resync; fields are never merged across syncs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// Calendar date the record describes
    pub date: NaiveDate,
    /// Total calories burned
    pub total_calories: f64,
    /// Active calories burned
    pub active_calories: f64,
    /// Basal calories burned
    pub bmr_calories: f64,
    /// Step count
    pub steps: u64,
    /// Distance covered in meters
    pub distance_meters: f64,
    /// Heart-rate summary
    pub heart_rate: HeartRate,
    /// Sleep stages
    pub sleep: SleepMetrics,
    /// Body composition, when measured that day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_composition: Option<BodyComposition>,
    /// Training classification of the day's activities
    pub training_type: TrainingType,
    /// Activities recorded that day
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// False when nothing usable came back from the provider
    pub has_data: bool,
    /// When the record was produced
    pub synced_at: DateTime<Utc>,
}

impl DayRecord {
    /// Structurally complete record for a date with no usable data
    #[must_use]
    pub fn placeholder(date: NaiveDate, synced_at: DateTime<Utc>) -> Self {
        Self {
            date,
            total_calories: 0.0,
            active_calories: 0.0,
            bmr_calories: 0.0,
            steps: 0,
            distance_meters: 0.0,
            heart_rate: HeartRate::default(),
            sleep: SleepMetrics::default(),
            body_composition: None,
            training_type: TrainingType::None,
            activities: Vec::new(),
            has_data: false,
            synced_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_type_accepts_legacy_tags() {
        let aerobic: TrainingType = serde_json::from_str("\"A\"").unwrap();
        let strength: TrainingType = serde_json::from_str("\"S\"").unwrap();
        assert_eq!(aerobic, TrainingType::Aerobic);
        assert_eq!(strength, TrainingType::Anaerobic);
        assert_eq!(serde_json::to_string(&TrainingType::Both).unwrap(), "\"both\"");
    }

    #[test]
    fn test_placeholder_is_empty() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let record = DayRecord::placeholder(date, Utc::now());
        assert!(!record.has_data);
        assert_eq!(record.steps, 0);
        assert!(record.total_calories.abs() < f64::EPSILON);
        assert!(record.activities.is_empty());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["hasData"], false);
        assert_eq!(json["trainingType"], "none");
    }
}
