// ABOUTME: Converts raw Garmin payloads into the canonical DayRecord
// ABOUTME: Total function: unknown shapes become defaults, an empty bundle becomes a placeholder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::fetcher::RawBundle;
use super::payload::{first_number, nested, number, text, RawPayload};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;
use zhiji_core::constants::energy::DEFAULT_BMR_KCAL;
use zhiji_core::intelligence::classify;
use zhiji_core::models::{Activity, BodyComposition, DayRecord, HeartRate, SleepMetrics};

type JsonObject = Map<String, Value>;

const GARMIN_LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Calories as reported, before defaults are applied
#[derive(Debug, Default, Clone, Copy)]
struct ReportedCalories {
    total: Option<f64>,
    active: Option<f64>,
    bmr: Option<f64>,
}

impl ReportedCalories {
    fn from_stats(stats: &JsonObject) -> Option<Self> {
        let reported = Self {
            total: number(stats, "totalKilocalories"),
            active: number(stats, "activeKilocalories"),
            bmr: number(stats, "bmrKilocalories"),
        };
        (reported.total.is_some() || reported.active.is_some() || reported.bmr.is_some())
            .then_some(reported)
    }

    /// `(total, active, bmr)` with the basal default and the total fallback applied
    fn resolve(self) -> (f64, f64, f64) {
        let active = self.active.unwrap_or(0.0).max(0.0);
        let bmr = self.bmr.filter(|v| *v > 0.0).unwrap_or(DEFAULT_BMR_KCAL);
        let total = self.total.filter(|v| *v > 0.0).unwrap_or(active + bmr);
        (total, active, bmr)
    }
}

/// Build the canonical record for `date`
///
/// Never fails. When every call failed, or nothing that came back carries a
/// recognizable field, the result is [`DayRecord::placeholder`].
#[must_use]
pub fn normalize(date: NaiveDate, bundle: &RawBundle, synced_at: DateTime<Utc>) -> DayRecord {
    if bundle.is_total_failure() {
        debug!(%date, "All Garmin calls failed, using placeholder record");
        return DayRecord::placeholder(date, synced_at);
    }

    let stats = bundle.stats.first_object();
    let calories = stats.and_then(ReportedCalories::from_stats);
    let steps = steps_from_payload(&bundle.steps)
        .or_else(|| stats.and_then(|s| number(s, "totalSteps")));
    let distance = distance_from_payload(&bundle.steps)
        .filter(|d| *d > 0.0)
        .or_else(|| stats.and_then(|s| number(s, "totalDistanceMeters")));
    let heart_rate = parse_heart_rate(&bundle.heart_rate, stats);
    let sleep = parse_sleep(&bundle.sleep);
    let body_composition = parse_body_composition(&bundle.body_composition);
    let activities = parse_activities(&bundle.activities);

    let has_data = calories.is_some()
        || steps.is_some()
        || distance.is_some()
        || heart_rate.is_some()
        || sleep.is_some()
        || body_composition.is_some()
        || !activities.is_empty();

    if !has_data {
        debug!(%date, "No usable Garmin fields, using placeholder record");
        return DayRecord::placeholder(date, synced_at);
    }

    let (total_calories, active_calories, bmr_calories) =
        calories.unwrap_or_default().resolve();

    DayRecord {
        date,
        total_calories,
        active_calories,
        bmr_calories,
        steps: steps.map_or(0, |s| s.max(0.0).round() as u64),
        distance_meters: distance.unwrap_or(0.0).max(0.0),
        heart_rate: heart_rate.unwrap_or_default(),
        sleep: sleep.unwrap_or_default(),
        body_composition,
        training_type: classify(&activities),
        activities,
        has_data: true,
        synced_at,
    }
}

fn steps_from_payload(payload: &RawPayload) -> Option<f64> {
    match payload {
        RawPayload::Object(map) => first_number(map, &["totalSteps", "steps"]),
        RawPayload::List(_) => sum_field(payload, &["steps"]),
        RawPayload::Absent | RawPayload::PrivacyProtected => None,
    }
}

fn distance_from_payload(payload: &RawPayload) -> Option<f64> {
    match payload {
        RawPayload::Object(map) => {
            first_number(map, &["totalDistance", "totalDistanceMeters", "distance"])
        }
        RawPayload::List(_) => sum_field(payload, &["distance", "totalDistance"]),
        RawPayload::Absent | RawPayload::PrivacyProtected => None,
    }
}

/// Sum a field over list entries; `None` when no entry has it
fn sum_field(payload: &RawPayload, keys: &[&str]) -> Option<f64> {
    payload
        .objects()
        .filter_map(|entry| first_number(entry, keys))
        .fold(None, |acc, value| Some(acc.unwrap_or(0.0) + value))
}

fn to_bpm(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

fn to_secs(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

fn average_from_samples(map: &JsonObject) -> Option<f64> {
    let samples: Vec<f64> = map
        .get("heartRateValues")?
        .as_array()?
        .iter()
        .filter_map(|sample| sample.as_array()?.get(1)?.as_f64())
        .filter(|bpm| *bpm > 0.0)
        .collect();

    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

fn parse_heart_rate(payload: &RawPayload, stats: Option<&JsonObject>) -> Option<HeartRate> {
    let daily = payload.first_object();
    let from_daily = |key: &str| daily.and_then(|m| number(m, key));
    let from_stats = |key: &str| stats.and_then(|m| number(m, key));

    let resting = from_daily("restingHeartRate").or_else(|| from_stats("restingHeartRate"));
    let max = from_daily("maxHeartRate").or_else(|| from_stats("maxHeartRate"));
    let average = from_daily("averageHeartRate")
        .or_else(|| daily.and_then(average_from_samples))
        .or_else(|| from_stats("averageHeartRate"));

    if resting.is_none() && max.is_none() && average.is_none() {
        return None;
    }

    Some(HeartRate {
        resting: resting.map_or(0, to_bpm),
        average: average.map_or(0, to_bpm),
        max: max.map_or(0, to_bpm),
    })
}

fn parse_sleep(payload: &RawPayload) -> Option<SleepMetrics> {
    let outer = payload.first_object()?;
    let dto = nested(outer, "dailySleepDTO").unwrap_or(outer);

    let deep = number(dto, "deepSleepSeconds");
    let light = number(dto, "lightSleepSeconds");
    let rem = number(dto, "remSleepSeconds");
    let awake = number(dto, "awakeSleepSeconds");
    let total = first_number(dto, &["sleepTimeSeconds", "totalSleepTimeSeconds"]);

    if [deep, light, rem, awake, total].iter().all(Option::is_none) {
        return None;
    }

    let deep_secs = deep.map_or(0, to_secs);
    let light_secs = light.map_or(0, to_secs);
    let rem_secs = rem.map_or(0, to_secs);

    Some(SleepMetrics {
        deep_secs,
        light_secs,
        rem_secs,
        awake_secs: awake.map_or(0, to_secs),
        total_secs: total.map_or(deep_secs + light_secs + rem_secs, to_secs),
    })
}

// Garmin reports mass in grams.
fn grams_to_kg(grams: f64) -> f64 {
    grams / 1000.0
}

fn parse_body_composition(payload: &RawPayload) -> Option<BodyComposition> {
    let outer = payload.first_object()?;
    let entry = nested(outer, "totalAverage")
        .filter(|avg| number(avg, "weight").is_some())
        .or_else(|| {
            outer
                .get("dateWeightList")
                .and_then(Value::as_array)
                .and_then(|list| list.iter().find_map(Value::as_object))
        })
        .unwrap_or(outer);

    let weight = number(entry, "weight").filter(|w| *w > 0.0);
    let body_fat = number(entry, "bodyFat").filter(|v| *v > 0.0);
    let body_water = number(entry, "bodyWater").filter(|v| *v > 0.0);
    let muscle_mass = number(entry, "muscleMass").filter(|v| *v > 0.0);

    if weight.is_none() && body_fat.is_none() && body_water.is_none() && muscle_mass.is_none() {
        return None;
    }

    Some(BodyComposition {
        weight_kg: weight.map_or(0.0, grams_to_kg),
        body_fat_percent: body_fat.unwrap_or(0.0),
        body_water_percent: body_water.unwrap_or(0.0),
        muscle_mass_kg: muscle_mass.map_or(0.0, grams_to_kg),
    })
}

fn activity_type(map: &JsonObject) -> Option<&str> {
    match map.get("activityType")? {
        Value::Object(kind) => text(kind, "typeKey"),
        Value::String(kind) if !kind.trim().is_empty() => Some(kind.as_str()),
        _ => None,
    }
}

fn parse_activity(map: &JsonObject) -> Option<Activity> {
    let kind = activity_type(map);
    let duration = first_number(map, &["duration", "elapsedDuration", "movingDuration"]);
    let name = text(map, "activityName");

    if kind.is_none() && duration.is_none() && name.is_none() {
        return None;
    }

    let kind = kind.unwrap_or("unknown");
    Some(Activity {
        id: map.get("activityId").and_then(Value::as_i64),
        name: name.unwrap_or(kind).to_owned(),
        activity_type: kind.to_owned(),
        duration_secs: duration.unwrap_or(0.0).max(0.0),
        calories: number(map, "calories").unwrap_or(0.0).max(0.0),
        distance_meters: number(map, "distance").unwrap_or(0.0).max(0.0),
        average_heart_rate: number(map, "averageHR").map(to_bpm),
        max_heart_rate: number(map, "maxHR").map(to_bpm),
        start_time_local: text(map, "startTimeLocal")
            .and_then(|s| NaiveDateTime::parse_from_str(s, GARMIN_LOCAL_TIME_FORMAT).ok()),
    })
}

fn parse_activities(payload: &RawPayload) -> Vec<Activity> {
    payload.objects().filter_map(parse_activity).collect()
}
