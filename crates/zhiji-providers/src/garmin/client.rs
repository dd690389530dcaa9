// ABOUTME: Credentialed Garmin Connect client owning one user's session
// ABOUTME: Rate-gates every call, retries login with backoff and drops the session on auth failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::api::{fetch_resource, Credentials, DayResource, GarminConnectApi, Session};
use crate::backoff::BackoffPolicy;
use crate::config::GarminConfig;
use crate::rate_gate::RequestGate;
use chrono::NaiveDate;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time;
use tracing::{debug, info, warn};
use zhiji_core::clock::Clock;
use zhiji_core::constants::garmin::PROVIDER_NAME;
use zhiji_core::errors::{ProviderError, ProviderResult};

/// One user's Garmin Connect session
///
/// All traffic of the client (logins included) passes through a single
/// [`RequestGate`], so callers sharing a client are serialized.
pub struct GarminClient {
    api: Arc<dyn GarminConnectApi>,
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    gate: RequestGate,
    backoff: BackoffPolicy,
    request_timeout: Duration,
    session: Mutex<Option<Session>>,
}

impl GarminClient {
    /// Build a client; no network traffic happens until the first call
    #[must_use]
    pub fn new(
        api: Arc<dyn GarminConnectApi>,
        credentials: Credentials,
        clock: Arc<dyn Clock>,
        config: &GarminConfig,
    ) -> Self {
        Self {
            api,
            credentials,
            gate: RequestGate::new(config.min_request_interval, clock.clone()),
            clock,
            backoff: config.backoff_policy(),
            request_timeout: config.request_timeout,
            session: Mutex::new(None),
        }
    }

    /// Log in now, replacing any held session
    ///
    /// # Errors
    ///
    /// Returns the last login error once the backoff policy gives up. Invalid
    /// credentials fail on the first attempt.
    pub async fn login(&self) -> ProviderResult<Session> {
        let mut guard = self.session.lock().await;
        let session = self.login_with_retries().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Return the held session, logging in first when there is none
    ///
    /// # Errors
    ///
    /// Returns the login error when a fresh login is needed and fails
    pub async fn ensure_session(&self) -> ProviderResult<Session> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }
        let session = self.login_with_retries().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Forget the held session
    pub async fn invalidate_session(&self) {
        *self.session.lock().await = None;
    }

    /// Whether a session is currently held
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Fetch one per-day resource
    ///
    /// # Errors
    ///
    /// Returns the provider error unchanged; an authentication error also
    /// drops the held session so the next call logs in again.
    pub async fn fetch(&self, resource: DayResource, date: NaiveDate) -> ProviderResult<Value> {
        let session = self.ensure_session().await?;

        self.gate.acquire().await;
        debug!(resource = %resource, %date, "Calling Garmin Connect");

        let result = self
            .bounded(fetch_resource(self.api.as_ref(), &session, resource, date))
            .await;

        if let Err(error) = &result {
            if error.is_authentication() {
                warn!(
                    user = %self.credentials.masked_email(),
                    "Garmin session rejected, dropping it: {error}"
                );
                self.invalidate_session().await;
            }
        }

        result
    }

    /// Account the client is bound to, masked for logs
    #[must_use]
    pub fn account(&self) -> String {
        self.credentials.masked_email()
    }

    async fn login_with_retries(&self) -> ProviderResult<Session> {
        let mut attempt = 1;
        loop {
            match self.establish().await {
                Ok(session) => {
                    info!(
                        user = %self.credentials.masked_email(),
                        attempt,
                        "Garmin login succeeded"
                    );
                    return Ok(session);
                }
                Err(error) => match self.backoff.delay_after(attempt, &error) {
                    Some(delay) => {
                        warn!(
                            attempt,
                            max_attempts = self.backoff.max_attempts,
                            delay_secs = delay.as_secs(),
                            "Garmin login failed, retrying: {error}"
                        );
                        self.clock.sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        warn!(attempt, "Garmin login failed, giving up: {error}");
                        return Err(error);
                    }
                },
            }
        }
    }

    /// One login attempt, plus the display-name lookup when Garmin omits it
    async fn establish(&self) -> ProviderResult<Session> {
        self.gate.acquire().await;
        let mut session = self.bounded(self.api.login(&self.credentials)).await?;
        if session.display_name.is_empty() {
            self.gate.acquire().await;
            debug!("Looking up Garmin display name");
            session.display_name = self.bounded(self.api.get_display_name(&session)).await?;
        }
        Ok(session)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = ProviderResult<T>> + Send,
    ) -> ProviderResult<T> {
        time::timeout(self.request_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::Timeout {
                    provider: PROVIDER_NAME.to_owned(),
                    timeout_secs: self.request_timeout.as_secs(),
                })
            })
    }
}
