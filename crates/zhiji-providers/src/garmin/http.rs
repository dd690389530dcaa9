// ABOUTME: reqwest implementation of the Garmin Connect API seam
// ABOUTME: Maps HTTP status codes and transport failures onto the provider error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::api::{Credentials, GarminConnectApi, Session};
use crate::config::GarminConfig;
use crate::http_client::shared_client;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroizing;
use zhiji_core::constants::garmin::{DEFAULT_RATE_LIMIT_BACKOFF_SECS, PROVIDER_NAME};
use zhiji_core::errors::{ProviderError, ProviderResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const ACTIVITY_PAGE_LIMIT: &str = "100";
const SLEEP_BUFFER_MINUTES: &str = "60";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocialProfile {
    display_name: String,
}

/// Garmin Connect over HTTPS
#[derive(Clone)]
pub struct GarminConnectHttp {
    client: Client,
    base_url: Url,
    sso_url: Url,
    timeout_secs: u64,
}

impl GarminConnectHttp {
    /// Build from configuration, using the shared pooled HTTP client
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when either URL does not parse
    pub fn new(config: &GarminConfig) -> ProviderResult<Self> {
        Self::with_client(shared_client().clone(), config)
    }

    /// Build with an explicit HTTP client
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when either URL does not parse
    pub fn with_client(client: Client, config: &GarminConfig) -> ProviderResult<Self> {
        Ok(Self {
            client,
            base_url: parse_url(&config.base_url)?,
            sso_url: parse_url(&config.sso_url)?,
            timeout_secs: config.request_timeout.as_secs(),
        })
    }

    fn endpoint(&self, path: &str) -> ProviderResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| configuration_error(format!("invalid endpoint {path}: {e}")))
    }

    async fn get_json(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<Value> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET Garmin Connect");
        let request = self
            .client
            .get(url)
            .bearer_auth(session.access_token.as_str())
            .query(query);
        let response = self.send(request).await?;
        read_json(response).await
    }

    async fn send(&self, request: RequestBuilder) -> ProviderResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if response.status().is_success() {
            return Ok(response);
        }
        Err(status_error(response).await)
    }

    fn transport_error(&self, error: &reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout {
                provider: PROVIDER_NAME.to_owned(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            ProviderError::Network {
                provider: PROVIDER_NAME.to_owned(),
                message: error.to_string(),
            }
        }
    }

    fn display_path(session: &Session, prefix: &str) -> String {
        format!("{prefix}/{}", session.display_name)
    }
}

fn configuration_error(details: String) -> ProviderError {
    ProviderError::ConfigurationError {
        provider: PROVIDER_NAME.to_owned(),
        details,
    }
}

fn parse_url(raw: &str) -> ProviderResult<Url> {
    // Trailing slash so `join` appends instead of replacing the last segment
    let normalized = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| configuration_error(format!("invalid URL {raw}: {e}")))
}

async fn read_json(response: Response) -> ProviderResult<Value> {
    let body = response.text().await.map_err(|e| ProviderError::Network {
        provider: PROVIDER_NAME.to_owned(),
        message: e.to_string(),
    })?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse {
        provider: PROVIDER_NAME.to_owned(),
        message: e.to_string(),
    })
}

/// Map a non-success response onto the provider error taxonomy
async fn status_error(response: Response) -> ProviderError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationFailed {
            provider: PROVIDER_NAME.to_owned(),
            reason: format!("HTTP {}: {}", status.as_u16(), truncate(&body)),
        },
        StatusCode::TOO_MANY_REQUESTS => {
            warn!(retry_after_secs = ?retry_after, "Garmin rate limit hit");
            ProviderError::RateLimitExceeded {
                provider: PROVIDER_NAME.to_owned(),
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RATE_LIMIT_BACKOFF_SECS),
                limit_type: "api".to_owned(),
            }
        }
        _ => ProviderError::ApiError {
            provider: PROVIDER_NAME.to_owned(),
            status_code: status.as_u16(),
            message: truncate(&body),
            retryable: status.is_server_error(),
        },
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

#[async_trait]
impl GarminConnectApi for GarminConnectHttp {
    async fn login(&self, credentials: &Credentials) -> ProviderResult<Session> {
        let form = [
            ("username", credentials.email()),
            ("password", credentials.password()),
        ];
        let response = self
            .send(self.client.post(self.sso_url.clone()).form(&form))
            .await?;
        let token: TokenResponse = serde_json::from_value(read_json(response).await?)
            .map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER_NAME.to_owned(),
                message: format!("token response: {e}"),
            })?;

        Ok(Session {
            access_token: Zeroizing::new(token.access_token),
            display_name: token.display_name.unwrap_or_default(),
            issued_at: Utc::now(),
        })
    }

    async fn get_display_name(&self, session: &Session) -> ProviderResult<String> {
        let profile = self
            .get_json(session, "userprofile-service/socialProfile", &[])
            .await?;
        let profile: SocialProfile =
            serde_json::from_value(profile).map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER_NAME.to_owned(),
                message: format!("social profile: {e}"),
            })?;
        Ok(profile.display_name)
    }

    async fn get_steps(&self, session: &Session, date: NaiveDate) -> ProviderResult<Value> {
        let day = date.format(DATE_FORMAT).to_string();
        let path = Self::display_path(session, "wellness-service/wellness/dailySummaryChart");
        self.get_json(session, &path, &[("date", day.as_str())]).await
    }

    async fn get_heart_rates(&self, session: &Session, date: NaiveDate) -> ProviderResult<Value> {
        let day = date.format(DATE_FORMAT).to_string();
        let path = Self::display_path(session, "wellness-service/wellness/dailyHeartRate");
        self.get_json(session, &path, &[("date", day.as_str())]).await
    }

    async fn get_sleep_data(&self, session: &Session, date: NaiveDate) -> ProviderResult<Value> {
        let day = date.format(DATE_FORMAT).to_string();
        let path = Self::display_path(session, "wellness-service/wellness/dailySleepData");
        self.get_json(
            session,
            &path,
            &[("date", day.as_str()), ("nonSleepBufferMinutes", SLEEP_BUFFER_MINUTES)],
        )
        .await
    }

    async fn get_activities_by_date(
        &self,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<Value> {
        let start = start.format(DATE_FORMAT).to_string();
        let end = end.format(DATE_FORMAT).to_string();
        self.get_json(
            session,
            "activitylist-service/activities/search/activities",
            &[
                ("startDate", start.as_str()),
                ("endDate", end.as_str()),
                ("start", "0"),
                ("limit", ACTIVITY_PAGE_LIMIT),
            ],
        )
        .await
    }

    async fn get_body_composition(
        &self,
        session: &Session,
        date: NaiveDate,
    ) -> ProviderResult<Value> {
        let day = date.format(DATE_FORMAT).to_string();
        self.get_json(
            session,
            "weight-service/weight/dateRange",
            &[("startDate", day.as_str()), ("endDate", day.as_str())],
        )
        .await
    }

    async fn get_stats(&self, session: &Session, date: NaiveDate) -> ProviderResult<Value> {
        let day = date.format(DATE_FORMAT).to_string();
        let path = Self::display_path(session, "usersummary-service/usersummary/daily");
        self.get_json(session, &path, &[("calendarDate", day.as_str())]).await
    }
}
