// ABOUTME: Server configuration assembled from environment variables
// ABOUTME: Combines Garmin client, sync, store and default account settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::store::StoreConfig;
use super::sync::SyncConfig;
use std::env;
use tracing::info;
use zhiji_core::errors::AppResult;
use zhiji_providers::{Credentials, GarminConfig};

/// Default user id used by single-user deployments
pub const DEFAULT_USER_ID: &str = "default_user";

/// Garmin account configured through `GARMIN_EMAIL` / `GARMIN_PASSWORD`
#[derive(Debug, Clone)]
pub struct DefaultAccountConfig {
    /// User the account is registered for
    pub user_id: String,
    /// Garmin credentials
    pub credentials: Credentials,
}

impl DefaultAccountConfig {
    /// Read the default account, if both credentials are set and non-empty
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let email = env::var("GARMIN_EMAIL").ok().filter(|v| !v.trim().is_empty())?;
        let password = env::var("GARMIN_PASSWORD").ok().filter(|v| !v.is_empty())?;
        let user_id = env::var("ZHIJI_DEFAULT_USER")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ID.to_owned());

        Some(Self {
            user_id,
            credentials: Credentials::new(email, password),
        })
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Garmin client settings
    pub garmin: GarminConfig,
    /// Sync policy
    pub sync: SyncConfig,
    /// Store backend
    pub store: StoreConfig,
    /// Account registered at startup
    pub default_account: Option<DefaultAccountConfig>,
}

impl ServerConfig {
    /// Load the whole configuration from environment
    ///
    /// # Errors
    ///
    /// Returns a config error when a policy value cannot be understood
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            garmin: GarminConfig::from_env(),
            sync: SyncConfig::from_env()?,
            store: StoreConfig::from_env(),
            default_account: DefaultAccountConfig::from_env(),
        };
        config.log_summary();
        Ok(config)
    }

    fn log_summary(&self) {
        info!(
            garmin.base_url = %self.garmin.base_url,
            garmin.min_interval_ms = self.garmin.min_request_interval.as_millis(),
            garmin.login_attempts = self.garmin.login_max_attempts,
            sync.today_staleness_secs = self.sync.today_staleness.as_secs(),
            sync.max_range_days = self.sync.max_range_days,
            sync.privacy_policy = %self.sync.privacy_policy,
            sync.auto_sync_at = ?self.sync.auto_sync_at,
            store.backend = if self.store.redis_url.is_some() { "redis" } else { "memory" },
            store.key_prefix = %self.store.key_prefix,
            default_account = self.default_account.is_some(),
            "Configuration loaded"
        );
    }
}
