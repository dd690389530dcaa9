// ABOUTME: Store backend factory for environment-based backend selection
// ABOUTME: Redis when a URL is configured, in-memory otherwise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::{InMemoryStore, KeyValueStore, RedisStore, Store};
use crate::config::StoreConfig;
use std::sync::Arc;
use tracing::info;
use zhiji_core::errors::AppResult;

/// Create the configured backend
///
/// # Errors
///
/// Returns an error if Redis is configured but unreachable
pub async fn create_backend(config: &StoreConfig) -> AppResult<Arc<dyn KeyValueStore>> {
    match &config.redis_url {
        Some(url) => {
            info!("Initializing Redis store");
            Ok(Arc::new(
                RedisStore::connect(url, &config.redis_connection).await?,
            ))
        }
        None => {
            info!("No Redis URL configured, initializing in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

impl Store {
    /// Build the configured store
    ///
    /// # Errors
    ///
    /// Returns an error if Redis is configured but unreachable
    pub async fn from_config(config: &StoreConfig) -> AppResult<Self> {
        let backend = create_backend(config).await?;
        Ok(Self::new(backend, config.key_prefix.clone()))
    }
}
