// ABOUTME: Main library entry point for the Zhiji sync and nutrition service
// ABOUTME: Garmin day sync, food log and daily fat-change summaries over a key-value store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

#![deny(unsafe_code)]

//! # Zhiji Server
//!
//! Pulls daily health data from Garmin Connect, keeps a food intake log and
//! estimates the day's body-fat change from the energy balance.
//!
//! ## Architecture
//!
//! - **`zhiji-core`**: models, error types, clock, training classifier and estimator
//! - **`zhiji-providers`**: Garmin client, per-day fetcher and normalizer
//! - **Store**: key-value persistence, in-memory or Redis
//! - **Sync**: cache-aware single-day and range syncs
//! - **Summary**: per-day aggregation of intake and expenditure
//! - **Profile**: per-user body measurements and goals
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use zhiji_server::config::ServerConfig;
//! use zhiji_server::service::ZhijiService;
//! use zhiji_core::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let service = ZhijiService::from_config(config).await?;
//!     let today = chrono::Utc::now().date_naive();
//!     let summary = service.get_daily_summary("default_user", today).await?;
//!     println!("fat change: {:.1} g", summary.fat_change_grams);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// Food intake log
pub mod food;

/// Structured logging setup
pub mod logging;

/// User profiles
pub mod profile;

/// Service facade
pub mod service;

/// Key-value persistence
pub mod store;

/// Daily summary aggregation
pub mod summary;

/// Garmin sync and cache
pub mod sync;

pub use service::{ServiceParts, ZhijiService};
