// ABOUTME: Redis key-value store over a reconnecting ConnectionManager
// ABOUTME: Shares data across service instances; keys carry the configured namespace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::KeyValueStore;
use crate::config::RedisConnectionConfig;
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{error, info, warn};
use zhiji_core::errors::{AppError, AppResult};

/// Redis-backed store using `ConnectionManager` for automatic reconnection
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis, retrying the first connection on a capped doubling delay
    ///
    /// # Errors
    ///
    /// Returns a config error for an invalid URL and a storage error when
    /// Redis stays unreachable through every startup retry
    pub async fn connect(redis_url: &str, settings: &RedisConnectionConfig) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::config(format!("Invalid Redis URL: {e}")))?;
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(settings.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(settings.response_timeout_secs))
            .set_number_of_retries(settings.reconnection_retries)
            .set_exponent_base(settings.retry_exponent_base)
            .set_max_delay(settings.max_retry_delay_ms);

        let mut delays = startup_delays(settings);
        let mut attempt = 1_u32;
        loop {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await {
                Ok(manager) => {
                    info!(attempt, "Redis store connected");
                    return Ok(Self { manager });
                }
                Err(error) => {
                    let Some(delay) = delays.next() else {
                        return Err(AppError::storage(format!(
                            "Redis unreachable after {attempt} attempts"
                        ))
                        .with_source(error));
                    };
                    warn!(attempt, ?delay, "Redis unreachable, retrying: {error}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Waits between startup connection attempts
fn startup_delays(settings: &RedisConnectionConfig) -> impl Iterator<Item = Duration> {
    let cap = settings.max_retry_delay_ms;
    std::iter::successors(Some(settings.initial_retry_delay_ms.min(cap)), move |ms| {
        Some(ms.saturating_mul(2).min(cap))
    })
    .map(Duration::from_millis)
    .take(settings.initial_connection_retries as usize)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.manager.clone();
        conn.get(key).await.map_err(|e| {
            error!(key, "Redis GET failed: {e}");
            AppError::storage(format!("Redis GET failed: {e}"))
        })
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(key, value).await.map_err(|e| {
            error!(key, "Redis SET failed: {e}");
            AppError::storage(format!("Redis SET failed: {e}"))
        })
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
