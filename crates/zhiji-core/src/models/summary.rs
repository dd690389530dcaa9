// ABOUTME: Daily summary combining food intake with Garmin expenditure
// ABOUTME: Embeds the energy balance result produced by the fat-change estimator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::day_record::TrainingType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Direction of the day's energy balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BalanceMode {
    /// Intake below expenditure
    Deficit,
    /// Intake at or above expenditure
    Surplus,
}

/// Output of the fat-change estimator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergyBalanceResult {
    /// Calories in minus calories out (negative in a deficit)
    pub energy_delta_kcal: f64,
    /// Deficit or surplus
    pub mode: BalanceMode,
    /// Share of the energy delta attributed to fat mass
    pub conversion_ratio: f64,
    /// Estimated fat mass change in grams (negative means loss)
    pub fat_change_grams: f64,
}

/// Where the day's expenditure figure came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaloriesOutSource {
    /// Synced Garmin day record
    Garmin,
    /// Configured default expenditure
    Default,
}

/// Per-day roll-up of intake, expenditure and estimated fat change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Calendar date
    pub date: NaiveDate,
    /// Sum of food calories
    pub total_calories_in: f64,
    /// Sum of food protein (g)
    pub total_protein: f64,
    /// Sum of food carbohydrates (g)
    pub total_carbs: f64,
    /// Sum of food fat (g)
    pub total_fat: f64,
    /// Calories burned
    pub total_calories_out: f64,
    /// Source of `total_calories_out`
    pub calories_out_source: CaloriesOutSource,
    /// Training classification used by the estimator
    pub training_type: TrainingType,
    /// Estimated fat change (g)
    pub fat_change_grams: f64,
    /// Full estimator output
    pub energy_balance: EnergyBalanceResult,
    /// Number of food records summed
    pub food_record_count: usize,
    /// Last recompute time
    pub updated_at: DateTime<Utc>,
}
