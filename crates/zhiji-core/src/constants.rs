// ABOUTME: Domain constants for energy balance, Garmin defaults and store key layout
// ABOUTME: Shared by the provider normalizer, the summary aggregator and the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

/// Energy constants used by normalization and estimation
pub mod energy {
    /// Basal metabolic rate assumed when the provider does not report one (kcal)
    pub const DEFAULT_BMR_KCAL: f64 = 1800.0;

    /// Daily expenditure assumed for a date with no synced Garmin data (kcal)
    pub const DEFAULT_CALORIES_OUT_KCAL: f64 = 2000.0;

    /// Energy stored in one gram of body fat (kcal)
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
}

/// Profile values handed out before a user saves their own
pub mod profile {
    /// Height (cm)
    pub const DEFAULT_HEIGHT_CM: f64 = 170.0;

    /// Current body weight (kg)
    pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

    /// Goal body weight (kg)
    pub const DEFAULT_TARGET_WEIGHT_KG: f64 = 65.0;

    /// Daily intake goal (kcal)
    pub const DEFAULT_DAILY_CALORIE_GOAL_KCAL: f64 = 2000.0;
}

/// Training classification thresholds
pub mod training {
    /// Minimum aerobic session length that counts as aerobic training (seconds)
    pub const AEROBIC_MIN_DURATION_SECS: f64 = 30.0 * 60.0;

    /// Minimum strength session length that counts as anaerobic training (seconds)
    pub const STRENGTH_MIN_DURATION_SECS: f64 = 40.0 * 60.0;

    /// Activity type fragments treated as aerobic
    pub const AEROBIC_TYPES: &[&str] = &[
        "running",
        "cycling",
        "swimming",
        "walking",
        "hiking",
        "elliptical",
        "cardio",
        "treadmill",
    ];

    /// Activity type fragments treated as strength work
    pub const STRENGTH_TYPES: &[&str] = &[
        "strength_training",
        "weight_training",
        "gym",
        "fitness_equipment",
        "strength",
    ];
}

/// Garmin client defaults
pub mod garmin {
    /// Provider name used in errors and logs
    pub const PROVIDER_NAME: &str = "garmin";

    /// Minimum spacing between two outbound calls on one session (ms)
    pub const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 2_000;

    /// Login attempts before giving up
    pub const DEFAULT_LOGIN_MAX_ATTEMPTS: u32 = 3;

    /// Rate-limit backoff step, multiplied by the attempt number (seconds)
    pub const DEFAULT_RATE_LIMIT_BACKOFF_SECS: u64 = 30;

    /// Fixed delay after a transient login failure (seconds)
    pub const DEFAULT_TRANSIENT_BACKOFF_SECS: u64 = 5;

    /// Per-request timeout (seconds)
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Connection timeout (seconds)
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Garmin Connect API base URL
    pub const DEFAULT_BASE_URL: &str = "https://connectapi.garmin.com";

    /// Garmin SSO token exchange URL
    pub const DEFAULT_SSO_URL: &str = "https://sso.garmin.com/sso/signin";
}

/// Sync policy defaults
pub mod sync {
    /// Cached data for today is considered fresh for this long (seconds)
    pub const DEFAULT_TODAY_STALENESS_SECS: u64 = 3_600;

    /// Largest date range accepted by a batch sync
    pub const DEFAULT_MAX_RANGE_DAYS: u32 = 31;

    /// Largest date span accepted by a summary range query
    pub const MAX_SUMMARY_RANGE_DAYS: i64 = 366;

    /// Local hour of the daily automatic sync
    pub const AUTO_SYNC_HOUR: u32 = 23;

    /// Local minute of the daily automatic sync
    pub const AUTO_SYNC_MINUTE: u32 = 55;
}

/// Key-value store layout
pub mod store {
    /// Default namespace prepended to every key
    pub const DEFAULT_KEY_PREFIX: &str = "zhiji";

    /// Build the key holding the cached Garmin day record
    #[must_use]
    pub fn garmin_day_key(prefix: &str, user_id: &str, date: &str) -> String {
        format!("{prefix}:user:{user_id}:garmin:{date}")
    }

    /// Build the key holding the food records of one day
    #[must_use]
    pub fn food_records_key(prefix: &str, user_id: &str, date: &str) -> String {
        format!("{prefix}:user:{user_id}:records:{date}")
    }

    /// Build the key holding a user's profile
    #[must_use]
    pub fn profile_key(prefix: &str, user_id: &str) -> String {
        format!("{prefix}:user:{user_id}:profile")
    }

    /// Build the key holding the daily summary
    #[must_use]
    pub fn summary_key(prefix: &str, user_id: &str, date: &str) -> String {
        format!("{prefix}:user:{user_id}:summary:{date}")
    }
}
