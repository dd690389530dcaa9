// ABOUTME: Per-user body and goal settings kept alongside the food log
// ABOUTME: Height, current and target weight, daily calorie goal and activity level
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use crate::constants::profile::{
    DEFAULT_DAILY_CALORIE_GOAL_KCAL, DEFAULT_HEIGHT_CM, DEFAULT_TARGET_WEIGHT_KG, DEFAULT_WEIGHT_KG,
};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Self-reported everyday activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Mostly sitting
    Low,
    /// Some walking or light exercise
    #[default]
    Moderate,
    /// Physically demanding days
    High,
}

impl ActivityLevel {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's body measurements and goals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Owning user
    pub id: String,
    /// Display name
    pub name: String,
    /// Height (cm)
    pub height: f64,
    /// Current body weight (kg)
    pub current_weight: f64,
    /// Goal body weight (kg)
    pub target_weight: f64,
    /// Intake goal (kcal per day)
    pub daily_calorie_goal: f64,
    /// Everyday activity
    #[serde(default)]
    pub activity_level: ActivityLevel,
    /// First save
    pub created_at: DateTime<Utc>,
    /// Latest save
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Profile handed out before the user saved one
    #[must_use]
    pub fn default_for(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: user_id.to_owned(),
            name: user_id.to_owned(),
            height: DEFAULT_HEIGHT_CM,
            current_weight: DEFAULT_WEIGHT_KG,
            target_weight: DEFAULT_TARGET_WEIGHT_KG,
            daily_calorie_goal: DEFAULT_DAILY_CALORIE_GOAL_KCAL,
            activity_level: ActivityLevel::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Kilograms left to lose (negative when below target)
    #[must_use]
    pub fn weight_to_target(&self) -> f64 {
        self.current_weight - self.target_weight
    }

    /// Reject non-positive body measurements and a negative calorie goal
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first offending field
    pub fn validate(&self) -> AppResult<()> {
        let positive = [
            ("height", self.height),
            ("currentWeight", self.current_weight),
            ("targetWeight", self.target_weight),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::invalid_input(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !self.daily_calorie_goal.is_finite() || self.daily_calorie_goal < 0.0 {
            return Err(AppError::invalid_input(format!(
                "dailyCalorieGoal must be a non-negative number, got {}",
                self.daily_calorie_goal
            )));
        }
        Ok(())
    }
}
