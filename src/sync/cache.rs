// ABOUTME: Per-user, per-date cache of normalized Garmin day records
// ABOUTME: Today's entry expires after the staleness window, past dates never expire
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use crate::store::Store;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use zhiji_core::errors::{AppResult, ErrorCode};
use zhiji_core::models::DayRecord;

/// Stored form of a cached day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncCacheEntry {
    /// Normalized record
    pub record: DayRecord,
    /// When the record was fetched
    pub last_sync: DateTime<Utc>,
}

/// Garmin day cache on top of the key-value store
#[derive(Clone)]
pub struct SyncCache {
    store: Store,
    today_staleness: Duration,
}

impl SyncCache {
    /// Create a cache whose entry for today stays fresh for `today_staleness`
    #[must_use]
    pub const fn new(store: Store, today_staleness: Duration) -> Self {
        Self {
            store,
            today_staleness,
        }
    }

    /// Cached entry for a date
    ///
    /// An entry that no longer decodes is reported as absent so the next sync
    /// overwrites it.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the backend is unreachable
    pub async fn get(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<SyncCacheEntry>> {
        let key = self.store.garmin_key(user_id, date);
        match self.store.get_json::<SyncCacheEntry>(&key).await {
            Ok(entry) => Ok(entry),
            Err(error) if error.code == ErrorCode::SerializationError => {
                warn!(user_id, %date, "Discarding undecodable cache entry: {error}");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Store a record; records without data are never cached
    ///
    /// Returns whether the record was written.
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn put(
        &self,
        user_id: &str,
        record: &DayRecord,
        synced_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        if !record.has_data {
            debug!(user_id, date = %record.date, "Not caching record without data");
            return Ok(false);
        }
        let entry = SyncCacheEntry {
            record: record.clone(),
            last_sync: synced_at,
        };
        self.store
            .set_json(&self.store.garmin_key(user_id, record.date), &entry)
            .await?;
        Ok(true)
    }

    /// Whether a cached entry can be served without re-fetching
    #[must_use]
    pub fn is_fresh(&self, entry: &SyncCacheEntry, today: NaiveDate, now: DateTime<Utc>) -> bool {
        if entry.record.date != today {
            return true;
        }
        match (now - entry.last_sync).to_std() {
            Ok(age) => age < self.today_staleness,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(date: NaiveDate, last_sync: DateTime<Utc>) -> SyncCacheEntry {
        let mut record = DayRecord::placeholder(date, last_sync);
        record.has_data = true;
        record.total_calories = 2100.0;
        SyncCacheEntry { record, last_sync }
    }

    fn cache() -> SyncCache {
        SyncCache::new(Store::in_memory("test"), Duration::from_secs(3600))
    }

    #[test]
    fn test_today_expires_after_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let synced = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let cache = cache();
        let cached = entry(today, synced);

        assert!(cache.is_fresh(&cached, today, synced + chrono::Duration::minutes(59)));
        assert!(!cache.is_fresh(&cached, today, synced + chrono::Duration::minutes(60)));
    }

    #[test]
    fn test_past_dates_never_expire() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let synced = Utc.with_ymd_and_hms(2024, 1, 2, 23, 0, 0).unwrap();

        assert!(cache().is_fresh(&entry(past, synced), today, synced + chrono::Duration::days(60)));
    }

    #[tokio::test]
    async fn test_records_without_data_are_not_cached() {
        let cache = cache();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let placeholder = DayRecord::placeholder(date, Utc::now());

        assert!(!cache.put("u1", &placeholder, Utc::now()).await.unwrap());
        assert!(cache.get("u1", date).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = cache();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let synced = Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap();
        let cached = entry(date, synced);

        assert!(cache.put("u1", &cached.record, synced).await.unwrap());
        assert_eq!(cache.get("u1", date).await.unwrap(), Some(cached));
        assert!(cache.get("u2", date).await.unwrap().is_none());
    }
}
