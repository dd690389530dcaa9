// ABOUTME: Per-user profile persistence over the key-value store
// ABOUTME: Unsaved users read a default profile; saves keep the original creation time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use crate::store::Store;
use std::sync::Arc;
use tracing::{debug, info};
use zhiji_core::clock::Clock;
use zhiji_core::errors::{AppError, AppResult};
use zhiji_core::models::UserProfile;

/// Reads and writes [`UserProfile`] values
#[derive(Clone)]
pub struct ProfileStore {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl ProfileStore {
    /// Create a profile store over the shared store
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Saved profile, or the default one when the user never saved
    ///
    /// The default is not persisted.
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn get(&self, user_id: &str) -> AppResult<UserProfile> {
        let key = self.store.profile_key(user_id);
        if let Some(profile) = self.store.get_json::<UserProfile>(&key).await? {
            return Ok(profile);
        }
        debug!(user_id, "No saved profile, using defaults");
        Ok(UserProfile::default_for(user_id, self.clock.now()))
    }

    /// Validate and store a profile for `user_id`
    ///
    /// The id is forced to `user_id`, `created_at` is carried over from the
    /// previous save and `updated_at` is set to now.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty user id or invalid measurements,
    /// or a storage error
    pub async fn save(&self, user_id: &str, mut profile: UserProfile) -> AppResult<UserProfile> {
        if user_id.trim().is_empty() {
            return Err(AppError::invalid_input("user id must not be empty"));
        }
        profile.validate()?;

        let key = self.store.profile_key(user_id);
        let now = self.clock.now();
        profile.created_at = self
            .store
            .get_json::<UserProfile>(&key)
            .await?
            .map_or(now, |previous| previous.created_at);
        profile.id = user_id.to_owned();
        profile.updated_at = now;

        self.store.set_json(&key, &profile).await?;
        info!(
            user_id,
            current_weight = profile.current_weight,
            target_weight = profile.target_weight,
            daily_calorie_goal = profile.daily_calorie_goal,
            "User profile saved"
        );
        Ok(profile)
    }
}
