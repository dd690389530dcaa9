// ABOUTME: Key-value store configuration for the in-memory and Redis backends
// ABOUTME: Redis URL discovery, key namespace and connection retry settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use std::env;
use zhiji_core::constants::store::DEFAULT_KEY_PREFIX;

/// Redis connection defaults
mod redis_defaults {
    pub const CONNECTION_TIMEOUT_SECS: u64 = 5;
    pub const RESPONSE_TIMEOUT_SECS: u64 = 3;
    pub const RECONNECTION_RETRIES: usize = 3;
    pub const RETRY_EXPONENT_BASE: u64 = 2;
    pub const MAX_RETRY_DELAY_MS: u64 = 5_000;
    pub const INITIAL_CONNECTION_RETRIES: u32 = 3;
    pub const INITIAL_RETRY_DELAY_MS: u64 = 500;
}

/// Redis connection and retry settings
#[derive(Debug, Clone)]
pub struct RedisConnectionConfig {
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Response/command timeout in seconds
    pub response_timeout_secs: u64,
    /// Number of reconnection retries after connection drop
    pub reconnection_retries: usize,
    /// Exponential backoff base for retry delays
    pub retry_exponent_base: u64,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Number of retries for initial connection at startup
    pub initial_connection_retries: u32,
    /// Initial retry delay in milliseconds (doubles with exponential backoff)
    pub initial_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: redis_defaults::CONNECTION_TIMEOUT_SECS,
            response_timeout_secs: redis_defaults::RESPONSE_TIMEOUT_SECS,
            reconnection_retries: redis_defaults::RECONNECTION_RETRIES,
            retry_exponent_base: redis_defaults::RETRY_EXPONENT_BASE,
            max_retry_delay_ms: redis_defaults::MAX_RETRY_DELAY_MS,
            initial_connection_retries: redis_defaults::INITIAL_CONNECTION_RETRIES,
            initial_retry_delay_ms: redis_defaults::INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl RedisConnectionConfig {
    /// Load Redis connection configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            connection_timeout_secs: env::var("REDIS_CONNECTION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis_defaults::CONNECTION_TIMEOUT_SECS),
            response_timeout_secs: env::var("REDIS_RESPONSE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis_defaults::RESPONSE_TIMEOUT_SECS),
            reconnection_retries: env::var("REDIS_RECONNECTION_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis_defaults::RECONNECTION_RETRIES),
            retry_exponent_base: env::var("REDIS_RETRY_EXPONENT_BASE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis_defaults::RETRY_EXPONENT_BASE),
            max_retry_delay_ms: env::var("REDIS_MAX_RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis_defaults::MAX_RETRY_DELAY_MS),
            initial_connection_retries: env::var("REDIS_INITIAL_CONNECTION_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis_defaults::INITIAL_CONNECTION_RETRIES),
            initial_retry_delay_ms: env::var("REDIS_INITIAL_RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis_defaults::INITIAL_RETRY_DELAY_MS),
        }
    }
}

/// Store backend selection
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Redis URL; `None` selects the in-memory backend
    pub redis_url: Option<String>,
    /// Namespace prepended to every key
    pub key_prefix: String,
    /// Redis connection tuning
    pub redis_connection: RedisConnectionConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
            redis_connection: RedisConnectionConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Load store configuration from environment
    ///
    /// `REDIS_REDIS_URL` (set by some hosting platforms) wins over `REDIS_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        let redis_url = env::var("REDIS_REDIS_URL")
            .or_else(|_| env::var("REDIS_URL"))
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            redis_url,
            key_prefix: env::var("ZHIJI_KEY_PREFIX")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_owned()),
            redis_connection: RedisConnectionConfig::from_env(),
        }
    }
}
