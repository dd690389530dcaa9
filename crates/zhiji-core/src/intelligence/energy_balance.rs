// ABOUTME: Estimates body-fat mass change from calorie intake, expenditure and training
// ABOUTME: Tiered conversion ratios for deficit and surplus with training adjustments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

//! Fat-change estimator
//!
//! With `D = calories_in - calories_out`:
//!
//! | mode    | base ratio by magnitude of `D`          | training adjustment (none/aerobic/anaerobic/both) |
//! |---------|-----------------------------------------|---------------------------------------------------|
//! | deficit | ≤700 → 0.60, ≤900 → 0.55, else 0.45     | +0.00 / +0.08 / +0.10 / +0.18                     |
//! | surplus | ≤400 → 0.50, ≤800 → 0.65, else 0.80     | +0.00 / −0.05 / −0.15 / −0.20                     |
//!
//! The fat change is `D * ratio / 9`, 9 kcal being the energy of one gram of fat.

use crate::constants::energy::KCAL_PER_GRAM_FAT;
use crate::models::{BalanceMode, EnergyBalanceResult, TrainingType};

fn deficit_base_ratio(deficit: f64) -> f64 {
    if deficit <= 700.0 {
        0.60
    } else if deficit <= 900.0 {
        0.55
    } else {
        0.45
    }
}

fn surplus_base_ratio(surplus: f64) -> f64 {
    if surplus <= 400.0 {
        0.50
    } else if surplus <= 800.0 {
        0.65
    } else {
        0.80
    }
}

const fn deficit_adjustment(training: TrainingType) -> f64 {
    match training {
        TrainingType::None => 0.00,
        TrainingType::Aerobic => 0.08,
        TrainingType::Anaerobic => 0.10,
        TrainingType::Both => 0.18,
    }
}

const fn surplus_adjustment(training: TrainingType) -> f64 {
    match training {
        TrainingType::None => 0.00,
        TrainingType::Aerobic => -0.05,
        TrainingType::Anaerobic => -0.15,
        TrainingType::Both => -0.20,
    }
}

/// Estimate the day's fat mass change
///
/// Never fails; any finite inputs produce a result.
#[must_use]
pub fn estimate(calories_in: f64, calories_out: f64, training: TrainingType) -> EnergyBalanceResult {
    let delta = calories_in - calories_out;

    if delta < 0.0 {
        let deficit = delta.abs();
        let ratio = deficit_base_ratio(deficit) + deficit_adjustment(training);
        EnergyBalanceResult {
            energy_delta_kcal: delta,
            mode: BalanceMode::Deficit,
            conversion_ratio: ratio,
            fat_change_grams: -deficit * ratio / KCAL_PER_GRAM_FAT,
        }
    } else {
        let ratio = surplus_base_ratio(delta) + surplus_adjustment(training);
        EnergyBalanceResult {
            energy_delta_kcal: delta,
            mode: BalanceMode::Surplus,
            conversion_ratio: ratio,
            fat_change_grams: delta * ratio / KCAL_PER_GRAM_FAT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 0.01;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_moderate_deficit_without_training() {
        let result = estimate(1500.0, 2200.0, TrainingType::None);
        assert_eq!(result.mode, BalanceMode::Deficit);
        assert_close(result.energy_delta_kcal, -700.0);
        assert_close(result.conversion_ratio, 0.60);
        assert_close(result.fat_change_grams, -46.67);
    }

    #[test]
    fn test_moderate_deficit_with_both() {
        let result = estimate(1500.0, 2200.0, TrainingType::Both);
        assert_close(result.conversion_ratio, 0.78);
        assert_close(result.fat_change_grams, -60.67);
    }

    #[test]
    fn test_small_surplus_without_training() {
        let result = estimate(2600.0, 2200.0, TrainingType::None);
        assert_eq!(result.mode, BalanceMode::Surplus);
        assert_close(result.energy_delta_kcal, 400.0);
        assert_close(result.conversion_ratio, 0.50);
        assert_close(result.fat_change_grams, 22.22);
    }

    #[test]
    fn test_large_surplus_with_both() {
        let result = estimate(3100.0, 2200.0, TrainingType::Both);
        assert_close(result.energy_delta_kcal, 900.0);
        assert_close(result.conversion_ratio, 0.60);
        assert_close(result.fat_change_grams, 60.0);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_close(estimate(0.0, 900.0, TrainingType::None).conversion_ratio, 0.55);
        assert_close(estimate(0.0, 901.0, TrainingType::None).conversion_ratio, 0.45);
        assert_close(estimate(800.0, 0.0, TrainingType::None).conversion_ratio, 0.65);
        assert_close(estimate(801.0, 0.0, TrainingType::Anaerobic).conversion_ratio, 0.65);
    }

    #[test]
    fn test_balanced_day_is_zero_surplus() {
        let result = estimate(2000.0, 2000.0, TrainingType::Aerobic);
        assert_eq!(result.mode, BalanceMode::Surplus);
        assert_close(result.fat_change_grams, 0.0);
    }
}
