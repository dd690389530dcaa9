// ABOUTME: Sync policy configuration: staleness window, range limits and privacy handling
// ABOUTME: Also fixes the UTC offset that decides which date counts as today
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;
use zhiji_core::constants::energy::DEFAULT_CALORIES_OUT_KCAL;
use zhiji_core::constants::sync::{
    AUTO_SYNC_HOUR, AUTO_SYNC_MINUTE, DEFAULT_MAX_RANGE_DAYS, DEFAULT_TODAY_STALENESS_SECS,
};
use zhiji_core::errors::{AppError, AppResult};

/// What a batch sync does when Garmin withholds a resource for privacy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyBlockPolicy {
    /// The withheld field is missing; the date is synced normally
    #[default]
    TreatAsMissing,
    /// The date gets a placeholder record and the batch moves on
    SkipDate,
    /// The batch stops before the blocked date
    AbortBatch,
}

impl FromStr for PrivacyBlockPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "treat_as_missing" | "missing" => Ok(Self::TreatAsMissing),
            "skip_date" | "skip" => Ok(Self::SkipDate),
            "abort_batch" | "abort" => Ok(Self::AbortBatch),
            other => Err(AppError::config(format!(
                "unknown privacy policy '{other}', expected treat_as_missing, skip_date or abort_batch"
            ))),
        }
    }
}

impl fmt::Display for PrivacyBlockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TreatAsMissing => "treat_as_missing",
            Self::SkipDate => "skip_date",
            Self::AbortBatch => "abort_batch",
        })
    }
}

/// Sync behavior settings
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How long a cached record for today stays fresh
    pub today_staleness: Duration,
    /// Largest accepted `days` for a range sync
    pub max_range_days: u32,
    /// Privacy block handling in range syncs
    pub privacy_policy: PrivacyBlockPolicy,
    /// Expenditure assumed for dates without Garmin data (kcal)
    pub default_calories_out: f64,
    /// Offset used to decide the current date
    pub timezone: FixedOffset,
    /// Local time of the daily automatic sync; `None` disables it
    pub auto_sync_at: Option<NaiveTime>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            today_staleness: Duration::from_secs(DEFAULT_TODAY_STALENESS_SECS),
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            privacy_policy: PrivacyBlockPolicy::default(),
            default_calories_out: DEFAULT_CALORIES_OUT_KCAL,
            timezone: Utc.fix(),
            auto_sync_at: NaiveTime::from_hms_opt(AUTO_SYNC_HOUR, AUTO_SYNC_MINUTE, 0),
        }
    }
}

impl SyncConfig {
    /// Load sync configuration from environment
    ///
    /// # Errors
    ///
    /// Returns a config error for an unknown `ZHIJI_PRIVACY_POLICY`. Numeric
    /// values that do not parse, the timezone offset included, fall back to
    /// their defaults.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let privacy_policy = match env::var("ZHIJI_PRIVACY_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.privacy_policy,
        };

        let timezone = env::var("ZHIJI_TIMEZONE_OFFSET_MINUTES").map_or(defaults.timezone, |raw| {
            parse_offset_minutes(&raw).unwrap_or_else(|| {
                warn!("Ignoring invalid ZHIJI_TIMEZONE_OFFSET_MINUTES '{raw}', using UTC");
                defaults.timezone
            })
        });

        let auto_sync_at = match env::var("ZHIJI_AUTO_SYNC_TIME") {
            Ok(raw) if matches!(raw.trim().to_lowercase().as_str(), "off" | "disabled" | "none") => None,
            Ok(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_or_else(
                |_| {
                    warn!("Ignoring invalid ZHIJI_AUTO_SYNC_TIME '{raw}', expected HH:MM or off");
                    defaults.auto_sync_at
                },
                Some,
            ),
            Err(_) => defaults.auto_sync_at,
        };

        Ok(Self {
            today_staleness: env::var("ZHIJI_TODAY_STALENESS_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.today_staleness, Duration::from_secs),
            max_range_days: env::var("ZHIJI_MAX_RANGE_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|days| *days > 0)
                .unwrap_or(defaults.max_range_days),
            privacy_policy,
            default_calories_out: env::var("ZHIJI_DEFAULT_CALORIES_OUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|kcal: &f64| kcal.is_finite() && *kcal >= 0.0)
                .unwrap_or(defaults.default_calories_out),
            timezone,
            auto_sync_at,
        })
    }
}

fn parse_offset_minutes(raw: &str) -> Option<FixedOffset> {
    let minutes: i32 = raw.trim().parse().ok()?;
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}
