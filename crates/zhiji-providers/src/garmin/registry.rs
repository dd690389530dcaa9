// ABOUTME: Per-user registry of Garmin clients
// ABOUTME: Each user owns an independent session and rate gate, no process-wide client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::api::{Credentials, GarminConnectApi};
use super::client::GarminClient;
use crate::config::GarminConfig;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;
use zhiji_core::clock::Clock;
use zhiji_core::constants::garmin::PROVIDER_NAME;
use zhiji_core::errors::{ProviderError, ProviderResult};

/// Concurrent map of user id to that user's Garmin client
pub struct ClientRegistry {
    clients: DashMap<String, Arc<GarminClient>>,
    api: Arc<dyn GarminConnectApi>,
    clock: Arc<dyn Clock>,
    config: GarminConfig,
}

impl ClientRegistry {
    /// Create an empty registry; every client shares `api` and `clock`
    #[must_use]
    pub fn new(api: Arc<dyn GarminConnectApi>, clock: Arc<dyn Clock>, config: GarminConfig) -> Self {
        Self {
            clients: DashMap::new(),
            api,
            clock,
            config,
        }
    }

    /// Bind credentials to a user, replacing any previous client and session
    pub fn register(&self, user_id: &str, credentials: Credentials) {
        info!(user_id, account = %credentials.masked_email(), "Registering Garmin credentials");
        let client = Arc::new(GarminClient::new(
            self.api.clone(),
            credentials,
            self.clock.clone(),
            &self.config,
        ));
        self.clients.insert(user_id.to_owned(), client);
    }

    /// Client for a user
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when the user has no registered credentials
    pub fn get(&self, user_id: &str) -> ProviderResult<Arc<GarminClient>> {
        self.clients
            .get(user_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ProviderError::ConfigurationError {
                provider: PROVIDER_NAME.to_owned(),
                details: format!("no Garmin credentials registered for user {user_id}"),
            })
    }

    /// Drop a user's client and session; returns whether one existed
    pub fn remove(&self, user_id: &str) -> bool {
        let removed = self.clients.remove(user_id).is_some();
        if removed {
            info!(user_id, "Removed Garmin credentials");
        }
        removed
    }

    /// Ids of every user with registered credentials, sorted
    #[must_use]
    pub fn user_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.clients.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }
}
