// ABOUTME: Pulls the six per-day Garmin resources through a credentialed client
// ABOUTME: Each call is isolated so one failing resource only leaves that field absent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use super::api::DayResource;
use super::client::GarminClient;
use super::payload::RawPayload;
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use zhiji_core::errors::ProviderResult;

/// Raw, possibly partial, Garmin data for one date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBundle {
    /// Step chart
    pub steps: RawPayload,
    /// Heart-rate summary
    pub heart_rate: RawPayload,
    /// Sleep data
    pub sleep: RawPayload,
    /// Body composition
    pub body_composition: RawPayload,
    /// Activity list
    pub activities: RawPayload,
    /// Daily stats
    pub stats: RawPayload,
    /// Resources whose call failed
    pub failed: Vec<DayResource>,
    /// Resources Garmin withheld for privacy
    pub privacy_blocked: Vec<DayResource>,
}

impl RawBundle {
    fn slot_mut(&mut self, resource: DayResource) -> &mut RawPayload {
        match resource {
            DayResource::Steps => &mut self.steps,
            DayResource::HeartRate => &mut self.heart_rate,
            DayResource::Sleep => &mut self.sleep,
            DayResource::BodyComposition => &mut self.body_composition,
            DayResource::Activities => &mut self.activities,
            DayResource::Stats => &mut self.stats,
        }
    }

    /// Store a payload, recording privacy blocks
    pub fn set(&mut self, resource: DayResource, payload: RawPayload) {
        if payload == RawPayload::PrivacyProtected && !self.privacy_blocked.contains(&resource) {
            self.privacy_blocked.push(resource);
        }
        *self.slot_mut(resource) = payload;
    }

    /// Mark a resource as failed; its slot stays absent
    pub fn mark_failed(&mut self, resource: DayResource) {
        *self.slot_mut(resource) = RawPayload::Absent;
        if !self.failed.contains(&resource) {
            self.failed.push(resource);
        }
    }

    /// Every call failed
    #[must_use]
    pub fn is_total_failure(&self) -> bool {
        DayResource::ALL.iter().all(|r| self.failed.contains(r))
    }

    /// Garmin withheld at least one resource
    #[must_use]
    pub fn has_privacy_block(&self) -> bool {
        !self.privacy_blocked.is_empty()
    }
}

/// Fetch all resources of `date`, sequentially through the client's rate gate
///
/// # Errors
///
/// Returns the login error when no session can be established, and an
/// authentication failure from any call: the session is dead, so the
/// remaining calls are skipped. Every other failure leaves that resource
/// absent and is listed in [`RawBundle::failed`].
pub async fn fetch_day(client: &GarminClient, date: NaiveDate) -> ProviderResult<RawBundle> {
    client.ensure_session().await?;

    let mut bundle = RawBundle::default();

    for resource in DayResource::ALL {
        match client.fetch(resource, date).await {
            Ok(value) => {
                let payload = RawPayload::parse(value);
                if payload == RawPayload::PrivacyProtected {
                    info!(%date, resource = %resource, "Garmin resource is privacy protected");
                } else {
                    debug!(%date, resource = %resource, present = payload.is_present(), "Fetched Garmin resource");
                }
                bundle.set(resource, payload);
            }
            Err(error) if error.is_authentication() => {
                warn!(%date, resource = %resource, "Garmin authentication failed mid-fetch: {error}");
                return Err(error);
            }
            Err(error) => {
                warn!(%date, resource = %resource, "Garmin resource unavailable: {error}");
                bundle.mark_failed(resource);
            }
        }
    }

    Ok(bundle)
}
