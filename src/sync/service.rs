// ABOUTME: Orchestrates Garmin fetch, normalization, caching and summary refresh
// ABOUTME: Range syncs run oldest first, one date at a time, and stop on a dead session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::cache::SyncCache;
use crate::config::{PrivacyBlockPolicy, SyncConfig};
use crate::summary::DailySummaryAggregator;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use zhiji_core::clock::Clock;
use zhiji_core::errors::{AppError, AppResult, ErrorCode, ProviderError};
use zhiji_core::models::DayRecord;
use zhiji_providers::{fetch_day, normalize, ClientRegistry, DayResource, GarminClient};

/// Why a range sync stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAbortReason {
    /// Garmin rejected the session or the credentials
    AuthenticationExpired,
    /// Login kept being throttled
    RateLimited,
    /// No session could be established for another reason
    LoginFailed,
    /// A resource was withheld and the policy is to stop
    PrivacyBlocked,
}

/// Marker attached to a range sync that did not reach its end date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAbort {
    /// Why the batch stopped
    pub reason: BatchAbortReason,
    /// First date that was not synced
    pub date: NaiveDate,
    /// Human-readable cause
    pub message: String,
}

/// Result of a range sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSyncOutcome {
    /// One record per processed date, oldest first
    pub records: Vec<DayRecord>,
    /// Set when the batch stopped before the end date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<BatchAbort>,
}

impl BatchSyncOutcome {
    /// Every requested date was processed
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}

struct FetchedDay {
    record: DayRecord,
    total_failure: bool,
    privacy_blocked: Vec<DayResource>,
}

/// Garmin sync entry point
pub struct SyncService {
    registry: Arc<ClientRegistry>,
    cache: SyncCache,
    aggregator: DailySummaryAggregator,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
}

impl SyncService {
    /// Create a sync service
    #[must_use]
    pub fn new(
        registry: Arc<ClientRegistry>,
        cache: SyncCache,
        aggregator: DailySummaryAggregator,
        clock: Arc<dyn Clock>,
        config: SyncConfig,
    ) -> Self {
        Self {
            registry,
            cache,
            aggregator,
            clock,
            config,
        }
    }

    /// Normalized record for one date, served from cache while fresh
    ///
    /// Privacy-withheld resources are treated as missing here regardless of
    /// the range policy. When every Garmin call for the date fails the result
    /// is an uncached placeholder with `has_data == false`.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when the user has no credentials and a provider
    /// error when login fails or the session is rejected
    pub async fn sync_day(&self, user_id: &str, date: NaiveDate, force: bool) -> AppResult<DayRecord> {
        let today = self.today();
        if let Some(record) = self.cached(user_id, date, today, force).await? {
            return Ok(record);
        }

        let client = self.client(user_id)?;
        let fetched = self.fetch_fresh(&client, date).await?;
        if fetched.total_failure {
            warn!(user_id, %date, "Every Garmin request failed, returning placeholder");
            return Ok(DayRecord::placeholder(date, self.clock.now()));
        }

        self.commit(user_id, &fetched.record).await?;
        info!(user_id, %date, has_data = fetched.record.has_data, "Garmin day synced");
        Ok(fetched.record)
    }

    /// Sync `days` dates ending at `end`, oldest first
    ///
    /// A date whose Garmin calls all fail gets a placeholder record and the
    /// loop moves on. A login failure or rejected session stops the batch and
    /// returns what was synced so far with an abort marker.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `days` is zero or above the configured
    /// maximum, and `AuthRequired` when the user has no credentials
    pub async fn sync_range(
        &self,
        user_id: &str,
        end: NaiveDate,
        days: u32,
        force: bool,
    ) -> AppResult<BatchSyncOutcome> {
        if days == 0 || days > self.config.max_range_days {
            return Err(AppError::invalid_input(format!(
                "days must be between 1 and {}, got {days}",
                self.config.max_range_days
            )));
        }
        let start = end
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| AppError::invalid_input(format!("date range ending {end} is out of bounds")))?;

        let client = self.client(user_id)?;
        let today = self.today();
        let mut records = Vec::with_capacity(days as usize);

        info!(user_id, account = %client.account(), %start, %end, days, force, "Starting Garmin range sync");

        for date in start.iter_days().take(days as usize) {
            match self.cached(user_id, date, today, force).await {
                Ok(Some(record)) => {
                    records.push(record);
                    continue;
                }
                Ok(None) => {}
                Err(error) => warn!(user_id, %date, "Cache read failed, refetching: {error}"),
            }

            let fetched = match self.fetch_fresh(&client, date).await {
                Ok(fetched) => fetched,
                Err(error) => {
                    let abort = BatchAbort {
                        reason: abort_reason(&error),
                        date,
                        message: error.to_string(),
                    };
                    warn!(user_id, %date, reason = ?abort.reason, "Range sync aborted: {error}");
                    return Ok(BatchSyncOutcome {
                        records,
                        aborted: Some(abort),
                    });
                }
            };

            if fetched.total_failure {
                warn!(user_id, %date, "Every Garmin request failed, recording placeholder");
                records.push(DayRecord::placeholder(date, self.clock.now()));
                continue;
            }

            if !fetched.privacy_blocked.is_empty() {
                match self.config.privacy_policy {
                    PrivacyBlockPolicy::TreatAsMissing => {}
                    PrivacyBlockPolicy::SkipDate => {
                        info!(user_id, %date, blocked = ?fetched.privacy_blocked, "Skipping privacy-protected date");
                        records.push(DayRecord::placeholder(date, self.clock.now()));
                        continue;
                    }
                    PrivacyBlockPolicy::AbortBatch => {
                        let blocked: Vec<String> =
                            fetched.privacy_blocked.iter().map(ToString::to_string).collect();
                        warn!(user_id, %date, ?blocked, "Range sync aborted on privacy block");
                        return Ok(BatchSyncOutcome {
                            records,
                            aborted: Some(BatchAbort {
                                reason: BatchAbortReason::PrivacyBlocked,
                                date,
                                message: format!("privacy protected: {}", blocked.join(", ")),
                            }),
                        });
                    }
                }
            }

            if let Err(error) = self.commit(user_id, &fetched.record).await {
                warn!(user_id, %date, "Failed to cache synced record: {error}");
            }
            records.push(fetched.record);
        }

        info!(user_id, %start, %end, synced = records.len(), "Garmin range sync finished");
        Ok(BatchSyncOutcome {
            records,
            aborted: None,
        })
    }

    fn today(&self) -> NaiveDate {
        self.clock.today(self.config.timezone)
    }

    fn client(&self, user_id: &str) -> AppResult<Arc<GarminClient>> {
        self.registry.get(user_id).map_err(|error| {
            AppError::new(
                ErrorCode::AuthRequired,
                format!("no Garmin credentials registered for user {user_id}"),
            )
            .with_source(error)
        })
    }

    async fn cached(
        &self,
        user_id: &str,
        date: NaiveDate,
        today: NaiveDate,
        force: bool,
    ) -> AppResult<Option<DayRecord>> {
        if force {
            return Ok(None);
        }
        let Some(entry) = self.cache.get(user_id, date).await? else {
            return Ok(None);
        };
        if self.cache.is_fresh(&entry, today, self.clock.now()) {
            debug!(user_id, %date, last_sync = %entry.last_sync, "Serving cached Garmin day");
            Ok(Some(entry.record))
        } else {
            debug!(user_id, %date, last_sync = %entry.last_sync, "Cached Garmin day is stale");
            Ok(None)
        }
    }

    async fn fetch_fresh(
        &self,
        client: &GarminClient,
        date: NaiveDate,
    ) -> Result<FetchedDay, ProviderError> {
        let bundle = fetch_day(client, date).await?;
        let record = normalize(date, &bundle, self.clock.now());
        Ok(FetchedDay {
            total_failure: bundle.is_total_failure(),
            privacy_blocked: bundle.privacy_blocked,
            record,
        })
    }

    /// Cache the record and refresh the summary from whatever is now cached
    ///
    /// A record without data is not written, so the summary is rebuilt from
    /// the previously cached record (if any) rather than from the placeholder.
    async fn commit(&self, user_id: &str, record: &DayRecord) -> AppResult<()> {
        let refreshed = if self.cache.put(user_id, record, self.clock.now()).await? {
            self.aggregator.recompute_with_record(user_id, record).await
        } else {
            debug!(user_id, date = %record.date, "Synced record has no data, keeping cached summary input");
            self.aggregator.recompute(user_id, record.date).await
        };
        if let Err(error) = refreshed {
            warn!(user_id, date = %record.date, "Summary refresh after sync failed: {error}");
        }
        Ok(())
    }
}

fn abort_reason(error: &ProviderError) -> BatchAbortReason {
    match error {
        _ if error.is_authentication() => BatchAbortReason::AuthenticationExpired,
        ProviderError::RateLimitExceeded { .. } => BatchAbortReason::RateLimited,
        _ => BatchAbortReason::LoginFailed,
    }
}
