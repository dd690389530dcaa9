// ABOUTME: Key-value persistence contract and typed JSON wrapper
// ABOUTME: Pluggable in-memory and Redis backends behind a single get/set interface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

/// Backend selection from configuration
pub mod factory;
/// In-memory backend
pub mod memory;
/// Redis backend
pub mod redis;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use zhiji_core::constants::store::{food_records_key, garmin_day_key, profile_key, summary_key};
use zhiji_core::errors::AppResult;

pub use factory::create_backend;
pub use memory::InMemoryStore;
pub use self::redis::RedisStore;

/// Raw string key-value store
///
/// Writes are atomic per key and last-writer-wins; nothing spans keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: String) -> AppResult<()>;

    /// Backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// JSON-typed view over a [`KeyValueStore`] with the service key layout
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl Store {
    /// Wrap a backend, namespacing keys under `prefix`
    pub fn new(backend: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    /// Fresh in-memory store
    #[must_use]
    pub fn in_memory(prefix: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), prefix)
    }

    /// Read and decode a JSON value
    ///
    /// # Errors
    ///
    /// Returns a storage error from the backend or a serialization error when
    /// the stored value does not decode as `T`
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.backend.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a JSON value
    ///
    /// # Errors
    ///
    /// Returns a serialization or storage error
    pub async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, raw).await
    }

    /// Key of the cached Garmin record
    #[must_use]
    pub fn garmin_key(&self, user_id: &str, date: NaiveDate) -> String {
        garmin_day_key(&self.prefix, user_id, &date.to_string())
    }

    /// Key of the day's food records
    #[must_use]
    pub fn food_key(&self, user_id: &str, date: NaiveDate) -> String {
        food_records_key(&self.prefix, user_id, &date.to_string())
    }

    /// Key of the daily summary
    #[must_use]
    pub fn summary_key(&self, user_id: &str, date: NaiveDate) -> String {
        summary_key(&self.prefix, user_id, &date.to_string())
    }

    /// Key of the user's profile
    #[must_use]
    pub fn profile_key(&self, user_id: &str) -> String {
        profile_key(&self.prefix, user_id)
    }

    /// Backend name for logs
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }
}
