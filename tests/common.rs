// ABOUTME: Shared test utilities for the Zhiji integration tests
// ABOUTME: Quiet logging, a scripted Garmin API fake and service builders on a manual clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::wildcard_in_or_patterns
)]
#![allow(missing_docs)]
//! Shared test utilities for `zhiji_server`

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use zeroize::Zeroizing;
use zhiji_core::clock::ManualClock;
use zhiji_core::constants::garmin::PROVIDER_NAME;
use zhiji_core::errors::{ProviderError, ProviderResult};
use zhiji_providers::{Credentials, DayResource, GarminConfig, GarminConnectApi, Session};
use zhiji_server::config::{ServerConfig, SyncConfig};
use zhiji_server::store::Store;
use zhiji_server::{ServiceParts, ZhijiService};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub const USER: &str = "test_user";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2024-06-15 10:00 UTC
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap()
}

pub fn rate_limited() -> ProviderError {
    ProviderError::RateLimitExceeded {
        provider: PROVIDER_NAME.to_owned(),
        retry_after_secs: 30,
        limit_type: "login".to_owned(),
    }
}

pub fn network_error() -> ProviderError {
    ProviderError::Network {
        provider: PROVIDER_NAME.to_owned(),
        message: "connection reset".to_owned(),
    }
}

pub fn auth_failed() -> ProviderError {
    ProviderError::AuthenticationFailed {
        provider: PROVIDER_NAME.to_owned(),
        reason: "session expired".to_owned(),
    }
}

/// Stats payload with the given total calories
pub fn stats_payload(total_kcal: f64) -> Value {
    json!({
        "totalKilocalories": total_kcal,
        "activeKilocalories": total_kcal - 1700.0,
        "bmrKilocalories": 1700.0,
        "totalSteps": 10_432,
        "totalDistanceMeters": 7_810.5,
        "restingHeartRate": 52,
        "maxHeartRate": 171
    })
}

/// One running activity of `minutes`
pub fn running_payload(minutes: f64) -> Value {
    json!([{
        "activityId": 1001,
        "activityName": "Morning Run",
        "activityType": { "typeKey": "running" },
        "duration": minutes * 60.0,
        "calories": 420.0,
        "distance": 6_000.0,
        "averageHR": 148,
        "maxHR": 171,
        "startTimeLocal": "2024-06-15 07:05:00"
    }])
}

#[derive(Default)]
struct Script {
    logins: VecDeque<ProviderResult<()>>,
    responses: HashMap<(NaiveDate, DayResource), ProviderResult<Value>>,
    failing_dates: HashMap<NaiveDate, ProviderError>,
    calories: HashMap<NaiveDate, f64>,
    login_count: usize,
    calls: Vec<(DayResource, NaiveDate)>,
}

/// Garmin fake answering from per-date scripts
///
/// Unscripted dates return a full day of data; login succeeds unless a
/// failure was queued.
#[derive(Clone, Default)]
pub struct ScriptedGarminApi {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGarminApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue login outcomes, consumed one per attempt
    pub fn queue_login_failures(&self, errors: impl IntoIterator<Item = ProviderError>) {
        let mut script = self.script.lock().unwrap();
        script.logins.extend(errors.into_iter().map(Err));
    }

    /// Override a single resource on a date
    pub fn respond(&self, date: NaiveDate, resource: DayResource, response: ProviderResult<Value>) {
        self.script
            .lock()
            .unwrap()
            .responses
            .insert((date, resource), response);
    }

    /// Make every resource on a date fail with `error`
    pub fn fail_date(&self, date: NaiveDate, error: ProviderError) {
        self.script.lock().unwrap().failing_dates.insert(date, error);
    }

    /// Total calories reported in the stats of a date
    pub fn set_calories(&self, date: NaiveDate, total_kcal: f64) {
        self.script.lock().unwrap().calories.insert(date, total_kcal);
    }

    pub fn login_count(&self) -> usize {
        self.script.lock().unwrap().login_count
    }

    pub fn calls(&self) -> Vec<(DayResource, NaiveDate)> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Number of stats calls for a date, one per fetched day
    pub fn fetches_of(&self, date: NaiveDate) -> usize {
        self.calls()
            .iter()
            .filter(|(resource, d)| *resource == DayResource::Stats && *d == date)
            .count()
    }

    fn answer(&self, resource: DayResource, date: NaiveDate) -> ProviderResult<Value> {
        let mut script = self.script.lock().unwrap();
        script.calls.push((resource, date));
        if let Some(error) = script.failing_dates.get(&date) {
            return Err(error.clone());
        }
        if let Some(response) = script.responses.get(&(date, resource)) {
            return response.clone();
        }
        let calories = script.calories.get(&date).copied().unwrap_or(2_400.0);
        Ok(match resource {
            DayResource::Steps => json!([{ "steps": 6_000 }, { "steps": 4_432 }]),
            DayResource::HeartRate => json!({ "restingHeartRate": 52, "maxHeartRate": 171 }),
            DayResource::Sleep => json!({ "dailySleepDTO": {
                "deepSleepSeconds": 5_400, "lightSleepSeconds": 14_400,
                "remSleepSeconds": 5_400, "awakeSleepSeconds": 600
            }}),
            DayResource::BodyComposition => json!({ "totalAverage": { "weight": 72_500.0, "bodyFat": 18.2 } }),
            DayResource::Activities => running_payload(35.0),
            DayResource::Stats => stats_payload(calories),
        })
    }
}

#[async_trait]
impl GarminConnectApi for ScriptedGarminApi {
    async fn login(&self, _credentials: &Credentials) -> ProviderResult<Session> {
        let mut script = self.script.lock().unwrap();
        script.login_count += 1;
        if let Some(Err(error)) = script.logins.pop_front() {
            return Err(error);
        }
        Ok(Session {
            access_token: Zeroizing::new("token".to_owned()),
            display_name: "tester".to_owned(),
            issued_at: Utc::now(),
        })
    }

    async fn get_steps(&self, _session: &Session, date: NaiveDate) -> ProviderResult<Value> {
        self.answer(DayResource::Steps, date)
    }

    async fn get_heart_rates(&self, _session: &Session, date: NaiveDate) -> ProviderResult<Value> {
        self.answer(DayResource::HeartRate, date)
    }

    async fn get_sleep_data(&self, _session: &Session, date: NaiveDate) -> ProviderResult<Value> {
        self.answer(DayResource::Sleep, date)
    }

    async fn get_activities_by_date(
        &self,
        _session: &Session,
        start: NaiveDate,
        _end: NaiveDate,
    ) -> ProviderResult<Value> {
        self.answer(DayResource::Activities, start)
    }

    async fn get_body_composition(&self, _session: &Session, date: NaiveDate) -> ProviderResult<Value> {
        self.answer(DayResource::BodyComposition, date)
    }

    async fn get_stats(&self, _session: &Session, date: NaiveDate) -> ProviderResult<Value> {
        self.answer(DayResource::Stats, date)
    }
}

/// Service wired to a fake API, an in-memory store and a manual clock
pub struct TestHarness {
    pub api: ScriptedGarminApi,
    pub clock: Arc<ManualClock>,
    pub store: Store,
    pub service: ZhijiService,
}

pub fn test_config(sync: SyncConfig) -> ServerConfig {
    ServerConfig {
        garmin: GarminConfig {
            min_request_interval: Duration::from_millis(2_000),
            ..GarminConfig::default()
        },
        sync,
        ..ServerConfig::default()
    }
}

pub fn harness_with(sync: SyncConfig) -> TestHarness {
    init_test_logging();
    let api = ScriptedGarminApi::new();
    let clock = Arc::new(ManualClock::new(start_instant()));
    let store = Store::in_memory("test");
    let service = ZhijiService::new_with(ServiceParts {
        api: Arc::new(api.clone()),
        store: store.clone(),
        clock: clock.clone(),
        config: test_config(sync),
    });
    service
        .register_credentials(USER, "tester@example.com", "secret")
        .unwrap();
    TestHarness {
        api,
        clock,
        store,
        service,
    }
}

pub fn harness() -> TestHarness {
    harness_with(SyncConfig::default())
}
