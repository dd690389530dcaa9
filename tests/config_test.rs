// ABOUTME: Environment configuration tests for sync, store and default account settings
// ABOUTME: Serialized because every test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveTime;
use serial_test::serial;
use std::env;
use std::time::Duration;
use zhiji_core::errors::ErrorCode;
use zhiji_server::config::{
    DefaultAccountConfig, PrivacyBlockPolicy, ServerConfig, StoreConfig, SyncConfig,
};

const VARS: &[&str] = &[
    "ZHIJI_TODAY_STALENESS_SECS",
    "ZHIJI_MAX_RANGE_DAYS",
    "ZHIJI_PRIVACY_POLICY",
    "ZHIJI_DEFAULT_CALORIES_OUT",
    "ZHIJI_TIMEZONE_OFFSET_MINUTES",
    "ZHIJI_AUTO_SYNC_TIME",
    "ZHIJI_KEY_PREFIX",
    "ZHIJI_DEFAULT_USER",
    "REDIS_URL",
    "REDIS_REDIS_URL",
    "GARMIN_EMAIL",
    "GARMIN_PASSWORD",
    "GARMIN_MIN_REQUEST_INTERVAL_MS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.sync.today_staleness, Duration::from_secs(3600));
    assert_eq!(config.sync.max_range_days, 31);
    assert_eq!(config.sync.privacy_policy, PrivacyBlockPolicy::TreatAsMissing);
    assert!((config.sync.default_calories_out - 2000.0).abs() < f64::EPSILON);
    assert_eq!(config.garmin.min_request_interval, Duration::from_millis(2000));
    assert!(config.store.redis_url.is_none());
    assert_eq!(config.store.key_prefix, "zhiji");
    assert!(config.default_account.is_none());
}

#[test]
#[serial]
fn test_sync_settings_from_environment() {
    clear_env();
    env::set_var("ZHIJI_TODAY_STALENESS_SECS", "900");
    env::set_var("ZHIJI_PRIVACY_POLICY", "abort_batch");
    env::set_var("ZHIJI_TIMEZONE_OFFSET_MINUTES", "480");
    env::set_var("ZHIJI_MAX_RANGE_DAYS", "not-a-number");

    let config = SyncConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.today_staleness, Duration::from_secs(900));
    assert_eq!(config.privacy_policy, PrivacyBlockPolicy::AbortBatch);
    assert_eq!(config.timezone.local_minus_utc(), 8 * 3600);
    assert_eq!(config.max_range_days, 31);
}

#[test]
#[serial]
fn test_unknown_privacy_policy_is_a_config_error() {
    clear_env();
    env::set_var("ZHIJI_PRIVACY_POLICY", "sometimes");

    let err = SyncConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_invalid_timezone_offset_falls_back_to_utc() {
    for raw in ["eight", "100000", ""] {
        clear_env();
        env::set_var("ZHIJI_TIMEZONE_OFFSET_MINUTES", raw);

        let config = SyncConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.timezone.local_minus_utc(), 0, "offset {raw:?}");
    }
}

#[test]
#[serial]
fn test_auto_sync_time_from_environment() {
    clear_env();
    assert_eq!(
        SyncConfig::from_env().unwrap().auto_sync_at,
        NaiveTime::from_hms_opt(23, 55, 0)
    );

    env::set_var("ZHIJI_AUTO_SYNC_TIME", "06:30");
    assert_eq!(
        SyncConfig::from_env().unwrap().auto_sync_at,
        NaiveTime::from_hms_opt(6, 30, 0)
    );

    env::set_var("ZHIJI_AUTO_SYNC_TIME", "off");
    assert_eq!(SyncConfig::from_env().unwrap().auto_sync_at, None);

    env::set_var("ZHIJI_AUTO_SYNC_TIME", "25:99");
    let config = SyncConfig::from_env().unwrap();
    clear_env();
    assert_eq!(config.auto_sync_at, NaiveTime::from_hms_opt(23, 55, 0));
}

#[test]
#[serial]
fn test_platform_redis_url_wins() {
    clear_env();
    env::set_var("REDIS_URL", "redis://fallback:6379");
    env::set_var("REDIS_REDIS_URL", "redis://platform:6379");

    let config = StoreConfig::from_env();
    clear_env();

    assert_eq!(config.redis_url.as_deref(), Some("redis://platform:6379"));
}

#[test]
#[serial]
fn test_default_account_requires_both_credentials() {
    clear_env();
    env::set_var("GARMIN_EMAIL", "me@example.com");
    env::set_var("GARMIN_PASSWORD", "");
    assert!(DefaultAccountConfig::from_env().is_none());

    env::set_var("GARMIN_PASSWORD", "pw");
    let account = DefaultAccountConfig::from_env().unwrap();
    clear_env();

    assert_eq!(account.user_id, "default_user");
    assert_eq!(account.credentials.email(), "me@example.com");
}
