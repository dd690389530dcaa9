// ABOUTME: Core types and constants for the Zhiji Garmin sync and nutrition service
// ABOUTME: Foundation crate with error handling, domain models, clock and energy-balance algorithms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

#![deny(unsafe_code)]

//! # Zhiji Core
//!
//! Foundation crate providing shared types for the Zhiji service. Everything
//! in here is free of I/O so that the provider and server crates can share
//! one vocabulary for day records, food logs and summaries.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ProviderError`
//! - **constants**: Domain constants (basal default, kcal per gram of fat, key layout)
//! - **models**: `DayRecord`, `Activity`, `FoodRecord`, `DailySummary`
//! - **clock**: Injectable time source used by rate gates and backoff loops
//! - **intelligence**: Training classification and the energy-balance estimator

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (day records, activities, food records, summaries)
pub mod models;

/// Injectable clock abstraction
pub mod clock;

/// Pure algorithms: training classification and fat-change estimation
pub mod intelligence;
