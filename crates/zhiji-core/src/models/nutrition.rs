// ABOUTME: Food intake records logged by the user
// ABOUTME: FoodRecord, NewFoodRecord input and macro totals for a day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored food entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    /// Unique identifier
    pub id: String,
    /// Day the food was eaten
    pub date: NaiveDate,
    /// Local time of the meal (`HH:MM`)
    pub time: String,
    /// What was eaten
    pub description: String,
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein: f64,
    /// Carbohydrates (g)
    pub carbs: f64,
    /// Fat (g)
    pub fat: f64,
    /// Advice attached by the food recognizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_advice: Option<String>,
    /// Photo of the meal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// When the record was stored
    pub created_at: DateTime<Utc>,
}

/// Input for logging a new food entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFoodRecord {
    /// Day the food was eaten
    pub date: Option<NaiveDate>,
    /// Local time of the meal (`HH:MM`)
    pub time: Option<String>,
    /// What was eaten
    pub description: String,
    /// Energy (kcal)
    #[serde(default)]
    pub calories: f64,
    /// Protein (g)
    #[serde(default)]
    pub protein: f64,
    /// Carbohydrates (g)
    #[serde(default)]
    pub carbs: f64,
    /// Fat (g)
    #[serde(default)]
    pub fat: f64,
    /// Advice attached by the food recognizer
    #[serde(default)]
    pub ai_advice: Option<String>,
    /// Photo of the meal
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewFoodRecord {
    /// Reject negative or non-finite nutrient amounts
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first offending field
    pub fn validate(&self) -> AppResult<()> {
        let fields = [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::invalid_input(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Summed macros of a set of food records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroTotals {
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein: f64,
    /// Carbohydrates (g)
    pub carbs: f64,
    /// Fat (g)
    pub fat: f64,
}

impl MacroTotals {
    /// Sum the macros of every record
    #[must_use]
    pub fn sum<'a>(records: impl IntoIterator<Item = &'a FoodRecord>) -> Self {
        records.into_iter().fold(Self::default(), |acc, r| Self {
            calories: acc.calories + r.calories,
            protein: acc.protein + r.protein,
            carbs: acc.carbs + r.carbs,
            fat: acc.fat + r.fat,
        })
    }
}
