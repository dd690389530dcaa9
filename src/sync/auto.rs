// ABOUTME: Daily automatic Garmin sync of today's data for every registered user
// ABOUTME: Sleeps on the injected clock until the configured local time, then force-syncs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::service::SyncService;
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use zhiji_core::clock::Clock;
use zhiji_providers::ClientRegistry;

/// First run strictly after `now` at local time `at`
#[must_use]
pub fn next_run_after(now: DateTime<Utc>, timezone: FixedOffset, at: NaiveTime) -> DateTime<Utc> {
    let local = now.with_timezone(&timezone).naive_local();
    let mut run = local.date().and_time(at);
    if run <= local {
        run += ChronoDuration::days(1);
    }
    Utc.from_utc_datetime(&(run - ChronoDuration::seconds(i64::from(timezone.local_minus_utc()))))
}

/// Outcome of one automatic run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoSyncReport {
    /// Local date that was synced
    pub date: Option<NaiveDate>,
    /// Users whose day synced with data
    pub synced: Vec<String>,
    /// Users whose Garmin day came back empty
    pub empty: Vec<String>,
    /// Users whose sync failed, with the error text
    pub failed: Vec<(String, String)>,
}

/// Scheduled daily sync
pub struct AutoSync {
    sync: Arc<SyncService>,
    registry: Arc<ClientRegistry>,
    clock: Arc<dyn Clock>,
    timezone: FixedOffset,
    at: NaiveTime,
}

impl AutoSync {
    /// Schedule a daily sync at local time `at`
    #[must_use]
    pub fn new(
        sync: Arc<SyncService>,
        registry: Arc<ClientRegistry>,
        clock: Arc<dyn Clock>,
        timezone: FixedOffset,
        at: NaiveTime,
    ) -> Self {
        Self {
            sync,
            registry,
            clock,
            timezone,
            at,
        }
    }

    /// When the next run will start
    #[must_use]
    pub fn next_run(&self) -> DateTime<Utc> {
        next_run_after(self.clock.now(), self.timezone, self.at)
    }

    /// Force-sync today for every registered user, one after another
    ///
    /// A failing user is logged and does not stop the others.
    pub async fn run_once(&self) -> AutoSyncReport {
        let today = self.clock.today(self.timezone);
        let mut report = AutoSyncReport {
            date: Some(today),
            ..AutoSyncReport::default()
        };

        for user_id in self.registry.user_ids() {
            match self.sync.sync_day(&user_id, today, true).await {
                Ok(record) if record.has_data => report.synced.push(user_id),
                Ok(_) => report.empty.push(user_id),
                Err(error) => {
                    warn!(user_id, %today, "Automatic Garmin sync failed: {error}");
                    report.failed.push((user_id, error.to_string()));
                }
            }
        }

        info!(
            %today,
            synced = report.synced.len(),
            empty = report.empty.len(),
            failed = report.failed.len(),
            "Automatic Garmin sync finished"
        );
        report
    }

    /// Wait for the next scheduled time, then run
    pub async fn tick(&self) -> AutoSyncReport {
        let now = self.clock.now();
        let next = next_run_after(now, self.timezone, self.at);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        info!(next_run = %next, "Automatic Garmin sync scheduled");
        self.clock.sleep(wait).await;
        self.run_once().await
    }

    /// Run forever on the tokio runtime
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                self.tick().await;
            }
        })
    }
}
