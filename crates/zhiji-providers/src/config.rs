// ABOUTME: Garmin client configuration loaded from environment variables
// ABOUTME: Endpoints, request spacing, login retry policy and timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use crate::backoff::BackoffPolicy;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use zhiji_core::constants::garmin::{
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_LOGIN_MAX_ATTEMPTS,
    DEFAULT_MIN_REQUEST_INTERVAL_MS, DEFAULT_RATE_LIMIT_BACKOFF_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SSO_URL, DEFAULT_TRANSIENT_BACKOFF_SECS,
};

/// Garmin Connect client settings
#[derive(Debug, Clone)]
pub struct GarminConfig {
    /// Connect API base URL
    pub base_url: String,
    /// SSO token exchange URL
    pub sso_url: String,
    /// Minimum spacing between two outbound calls on one session
    pub min_request_interval: Duration,
    /// Login attempts before giving up
    pub login_max_attempts: u32,
    /// Rate-limit backoff step (multiplied by the attempt number)
    pub rate_limit_backoff: Duration,
    /// Fixed delay after a transient login failure
    pub transient_backoff: Duration,
    /// Bound on each individual call
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for GarminConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            sso_url: DEFAULT_SSO_URL.to_owned(),
            min_request_interval: Duration::from_millis(DEFAULT_MIN_REQUEST_INTERVAL_MS),
            login_max_attempts: DEFAULT_LOGIN_MAX_ATTEMPTS,
            rate_limit_backoff: Duration::from_secs(DEFAULT_RATE_LIMIT_BACKOFF_SECS),
            transient_backoff: Duration::from_secs(DEFAULT_TRANSIENT_BACKOFF_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl GarminConfig {
    /// Load Garmin client configuration from environment
    ///
    /// Unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("GARMIN_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
            sso_url: env::var("GARMIN_SSO_URL").unwrap_or_else(|_| DEFAULT_SSO_URL.to_owned()),
            min_request_interval: Duration::from_millis(env_or(
                "GARMIN_MIN_REQUEST_INTERVAL_MS",
                DEFAULT_MIN_REQUEST_INTERVAL_MS,
            )),
            login_max_attempts: env_or("GARMIN_LOGIN_MAX_RETRIES", DEFAULT_LOGIN_MAX_ATTEMPTS)
                .max(1),
            rate_limit_backoff: Duration::from_secs(env_or(
                "GARMIN_RATE_LIMIT_BACKOFF_SECS",
                DEFAULT_RATE_LIMIT_BACKOFF_SECS,
            )),
            transient_backoff: Duration::from_secs(env_or(
                "GARMIN_TRANSIENT_BACKOFF_SECS",
                DEFAULT_TRANSIENT_BACKOFF_SECS,
            )),
            request_timeout: Duration::from_secs(env_or(
                "GARMIN_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            connect_timeout: Duration::from_secs(env_or(
                "GARMIN_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        }
    }

    /// Login retry policy described by this configuration
    #[must_use]
    pub const fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: self.login_max_attempts,
            rate_limit_step: self.rate_limit_backoff,
            transient_delay: self.transient_backoff,
        }
    }
}
