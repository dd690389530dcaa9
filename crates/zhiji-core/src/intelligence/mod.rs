// ABOUTME: Pure training and energy-balance algorithms
// ABOUTME: Training classification from activities and fat-change estimation from calories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

/// Nonlinear energy balance to fat mass estimator
pub mod energy_balance;

/// Day-level training classification
pub mod training_classifier;

pub use energy_balance::estimate;
pub use training_classifier::classify;
