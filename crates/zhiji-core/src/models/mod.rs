// ABOUTME: Domain model re-exports for day records, nutrition and daily summaries
// ABOUTME: Serialized with camelCase field names for the store and the HTTP layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

/// Canonical per-day Garmin snapshot and its parts
pub mod day_record;

/// Food intake records
pub mod nutrition;

/// Per-user body measurements and goals
pub mod profile;

/// Daily summaries and energy balance results
pub mod summary;

pub use day_record::{Activity, BodyComposition, DayRecord, HeartRate, SleepMetrics, TrainingType};
pub use nutrition::{FoodRecord, MacroTotals, NewFoodRecord};
pub use profile::{ActivityLevel, UserProfile};
pub use summary::{BalanceMode, CaloriesOutSource, DailySummary, EnergyBalanceResult};
