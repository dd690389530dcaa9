// ABOUTME: Provider seam for Garmin Connect: login and the six per-day resource calls
// ABOUTME: Credentials and session types with secrets zeroized on drop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::fmt;
use zeroize::Zeroizing;
use zhiji_core::errors::ProviderResult;

/// Garmin account credentials
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Wrap an email and password
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Account email
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Account password
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Email safe to put in logs (`jo***@example.com`)
    #[must_use]
    pub fn masked_email(&self) -> String {
        match self.email.split_once('@') {
            Some((local, domain)) => {
                let visible: String = local.chars().take(2).collect();
                format!("{visible}***@{domain}")
            }
            None => "***".to_owned(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.masked_email())
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// An authenticated Garmin Connect session
#[derive(Clone)]
pub struct Session {
    /// Bearer token for API calls
    pub access_token: Zeroizing<String>,
    /// Garmin display name used in per-user endpoint paths
    pub display_name: String,
    /// When the session was established
    pub issued_at: DateTime<Utc>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("display_name", &self.display_name)
            .field("issued_at", &self.issued_at)
            .finish_non_exhaustive()
    }
}

/// The per-day sub-resources pulled for a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayResource {
    /// Step count and distance
    Steps,
    /// Heart-rate summary
    HeartRate,
    /// Sleep stages
    Sleep,
    /// Weight and body composition
    BodyComposition,
    /// Recorded activities
    Activities,
    /// Daily calorie and step totals
    Stats,
}

impl DayResource {
    /// Fetch order
    pub const ALL: [Self; 6] = [
        Self::Steps,
        Self::HeartRate,
        Self::Sleep,
        Self::BodyComposition,
        Self::Activities,
        Self::Stats,
    ];

    /// Stable name for logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::HeartRate => "heart_rate",
            Self::Sleep => "sleep",
            Self::BodyComposition => "body_composition",
            Self::Activities => "activities",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for DayResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw Garmin Connect operations
///
/// Data calls return the provider JSON untouched; shape handling belongs to
/// the normalizer.
#[async_trait]
pub trait GarminConnectApi: Send + Sync {
    /// Exchange credentials for a session
    ///
    /// The returned session may lack a display name; callers resolve it with
    /// [`GarminConnectApi::get_display_name`] as a separate call.
    async fn login(&self, credentials: &Credentials) -> ProviderResult<Session>;

    /// Display name of the account behind `session`
    async fn get_display_name(&self, session: &Session) -> ProviderResult<String> {
        Ok(session.display_name.clone())
    }

    /// Intraday step chart for a date
    async fn get_steps(&self, session: &Session, date: NaiveDate) -> ProviderResult<Value>;

    /// Heart-rate summary for a date
    async fn get_heart_rates(&self, session: &Session, date: NaiveDate) -> ProviderResult<Value>;

    /// Sleep data for the night ending on a date
    async fn get_sleep_data(&self, session: &Session, date: NaiveDate) -> ProviderResult<Value>;

    /// Activities started between two dates (inclusive)
    async fn get_activities_by_date(
        &self,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<Value>;

    /// Body composition measured on a date
    async fn get_body_composition(
        &self,
        session: &Session,
        date: NaiveDate,
    ) -> ProviderResult<Value>;

    /// Daily totals (calories, steps, heart rate)
    async fn get_stats(&self, session: &Session, date: NaiveDate) -> ProviderResult<Value>;
}

/// Dispatch one resource of `date` to the matching API call
pub(crate) async fn fetch_resource(
    api: &dyn GarminConnectApi,
    session: &Session,
    resource: DayResource,
    date: NaiveDate,
) -> ProviderResult<Value> {
    match resource {
        DayResource::Steps => api.get_steps(session, date).await,
        DayResource::HeartRate => api.get_heart_rates(session, date).await,
        DayResource::Sleep => api.get_sleep_data(session, date).await,
        DayResource::BodyComposition => api.get_body_composition(session, date).await,
        DayResource::Activities => api.get_activities_by_date(session, date, date).await,
        DayResource::Stats => api.get_stats(session, date).await,
    }
}
