// ABOUTME: Service facade exposing sync, summary, food log and profile operations
// ABOUTME: Wires store, Garmin client registry, cache and aggregator from configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use crate::config::{ServerConfig, SyncConfig};
use crate::food::FoodLog;
use crate::profile::ProfileStore;
use crate::store::Store;
use crate::summary::DailySummaryAggregator;
use crate::sync::{AutoSync, BatchSyncOutcome, SyncCache, SyncService};
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use zhiji_core::clock::{Clock, SystemClock};
use zhiji_core::errors::{AppError, AppResult};
use zhiji_core::models::{DailySummary, DayRecord, FoodRecord, NewFoodRecord, UserProfile};
use zhiji_providers::http_client::initialize_shared_client;
use zhiji_providers::{ClientRegistry, Credentials, GarminConnectApi, GarminConnectHttp};

/// Collaborators needed to assemble a [`ZhijiService`]
pub struct ServiceParts {
    /// Garmin Connect implementation
    pub api: Arc<dyn GarminConnectApi>,
    /// Key-value store
    pub store: Store,
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Full configuration
    pub config: ServerConfig,
}

/// Entry point for the inbound layer
pub struct ZhijiService {
    registry: Arc<ClientRegistry>,
    sync: Arc<SyncService>,
    aggregator: DailySummaryAggregator,
    food: FoodLog,
    profiles: ProfileStore,
    clock: Arc<dyn Clock>,
    timezone: FixedOffset,
    auto_sync_at: Option<NaiveTime>,
}

impl ZhijiService {
    /// Build the production service: configured store, HTTP Garmin client,
    /// system clock, and the default account when one is configured
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or a Garmin URL is invalid
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        initialize_shared_client(
            config.garmin.request_timeout.as_secs(),
            config.garmin.connect_timeout.as_secs(),
        );
        let store = Store::from_config(&config.store).await?;
        let api = Arc::new(GarminConnectHttp::new(&config.garmin)?);

        Ok(Self::new_with(ServiceParts {
            api,
            store,
            clock: Arc::new(SystemClock),
            config,
        }))
    }

    /// Assemble from explicit collaborators
    #[must_use]
    pub fn new_with(parts: ServiceParts) -> Self {
        let ServiceParts {
            api,
            store,
            clock,
            config,
        } = parts;
        let SyncConfig {
            today_staleness,
            default_calories_out,
            timezone,
            auto_sync_at,
            ..
        } = config.sync;

        let registry = Arc::new(ClientRegistry::new(api, clock.clone(), config.garmin.clone()));
        let cache = SyncCache::new(store.clone(), today_staleness);
        let food = FoodLog::new(store.clone(), clock.clone(), timezone);
        let aggregator = DailySummaryAggregator::new(
            store.clone(),
            cache.clone(),
            food.clone(),
            clock.clone(),
            default_calories_out,
        );
        let profiles = ProfileStore::new(store.clone(), clock.clone());
        let sync = Arc::new(SyncService::new(
            registry.clone(),
            cache,
            aggregator.clone(),
            clock.clone(),
            config.sync.clone(),
        ));

        if let Some(account) = config.default_account {
            registry.register(&account.user_id, account.credentials);
        }

        info!(store = store.backend_name(), "Zhiji service ready");
        Self {
            registry,
            sync,
            aggregator,
            food,
            profiles,
            clock,
            timezone,
            auto_sync_at,
        }
    }

    /// Bind Garmin credentials to a user, replacing any previous session
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the email or password is empty
    pub fn register_credentials(&self, user_id: &str, email: &str, password: &str) -> AppResult<()> {
        if user_id.trim().is_empty() {
            return Err(AppError::invalid_input("user id must not be empty"));
        }
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::invalid_input("Garmin email and password are required"));
        }
        self.registry
            .register(user_id, Credentials::new(email.trim(), password));
        Ok(())
    }

    /// Forget a user's Garmin credentials and session
    ///
    /// Cached days and summaries are kept. Returns whether credentials existed.
    pub fn remove_credentials(&self, user_id: &str) -> bool {
        self.registry.remove(user_id)
    }

    /// See [`SyncService::sync_day`]
    ///
    /// # Errors
    ///
    /// Propagates sync errors
    pub async fn sync_day(&self, user_id: &str, date: NaiveDate, force: bool) -> AppResult<DayRecord> {
        self.sync.sync_day(user_id, date, force).await
    }

    /// See [`SyncService::sync_range`]
    ///
    /// # Errors
    ///
    /// Propagates range validation and credential errors
    pub async fn sync_range(
        &self,
        user_id: &str,
        end: NaiveDate,
        days: u32,
        force: bool,
    ) -> AppResult<BatchSyncOutcome> {
        self.sync.sync_range(user_id, end, days, force).await
    }

    /// Summary for a date, computed on first read
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn get_daily_summary(&self, user_id: &str, date: NaiveDate) -> AppResult<DailySummary> {
        self.aggregator.get_daily_summary(user_id, date).await
    }

    /// Stored summaries in an inclusive range
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad range, or a storage error
    pub async fn get_summary_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailySummary>> {
        self.aggregator.get_summary_range(user_id, start, end).await
    }

    /// Recompute the summary after food records changed outside this service
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn on_food_record_changed(&self, user_id: &str, date: NaiveDate) -> AppResult<DailySummary> {
        self.aggregator.recompute(user_id, date).await
    }

    /// Log a food record and refresh that day's summary
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for bad nutrient values, or a storage error
    pub async fn add_food_record(&self, user_id: &str, input: NewFoodRecord) -> AppResult<FoodRecord> {
        let record = self.food.add(user_id, input).await?;
        self.refresh_after_food_change(user_id, record.date).await;
        Ok(record)
    }

    /// Delete a food record and refresh that day's summary
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id, or a storage error
    pub async fn delete_food_record(&self, user_id: &str, date: NaiveDate, id: &str) -> AppResult<FoodRecord> {
        let removed = self.food.delete(user_id, date, id).await?;
        self.refresh_after_food_change(user_id, date).await;
        Ok(removed)
    }

    /// Food records of a date
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn list_food_records(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<FoodRecord>> {
        self.food.list(user_id, date).await
    }

    /// Saved profile, or defaults when the user never saved one
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn get_user_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        self.profiles.get(user_id).await
    }

    /// Validate and store a profile
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for invalid measurements, or a storage error
    pub async fn save_user_profile(&self, user_id: &str, profile: UserProfile) -> AppResult<UserProfile> {
        self.profiles.save(user_id, profile).await
    }

    /// Daily automatic sync for every registered user, when configured
    #[must_use]
    pub fn auto_sync(&self) -> Option<AutoSync> {
        self.auto_sync_at.map(|at| {
            AutoSync::new(
                self.sync.clone(),
                self.registry.clone(),
                self.clock.clone(),
                self.timezone,
                at,
            )
        })
    }

    /// Spawn the daily automatic sync on the tokio runtime
    ///
    /// Returns `None` when the automatic sync is disabled.
    #[must_use]
    pub fn start_auto_sync(&self) -> Option<JoinHandle<()>> {
        let Some(auto) = self.auto_sync() else {
            info!("Automatic Garmin sync disabled");
            return None;
        };
        info!(next_run = %auto.next_run(), "Starting automatic Garmin sync");
        Some(auto.spawn())
    }

    async fn refresh_after_food_change(&self, user_id: &str, date: NaiveDate) {
        if let Err(error) = self.aggregator.recompute(user_id, date).await {
            warn!(user_id, %date, "Summary refresh after food change failed: {error}");
        }
    }
}
