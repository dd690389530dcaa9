// ABOUTME: Garmin Connect provider integration for the Zhiji sync service
// ABOUTME: Rate-gated credentialed client, per-day fetcher and payload normalizer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

#![deny(unsafe_code)]

//! # Zhiji Providers
//!
//! Everything that talks to Garmin Connect lives here. The layers, leaves first:
//!
//! - [`garmin::api::GarminConnectApi`]: the raw provider seam (HTTP in production)
//! - [`garmin::client::GarminClient`]: one user's session, rate gate and login retries
//! - [`garmin::fetcher`]: pulls the six per-day resources with per-field failure isolation
//! - [`garmin::normalizer`]: turns whatever came back into a canonical `DayRecord`

/// Provider client configuration loaded from the environment
pub mod config;

/// Shared HTTP client with connection pooling
pub mod http_client;

/// Login retry policy
pub mod backoff;

/// Minimum-interval gate serializing outbound calls
pub mod rate_gate;

/// Garmin Connect client, fetcher and normalizer
pub mod garmin;

pub use backoff::BackoffPolicy;
pub use config::GarminConfig;
pub use garmin::api::{Credentials, DayResource, GarminConnectApi, Session};
pub use garmin::client::GarminClient;
pub use garmin::fetcher::{fetch_day, RawBundle};
pub use garmin::http::GarminConnectHttp;
pub use garmin::normalizer::normalize;
pub use garmin::payload::RawPayload;
pub use garmin::registry::ClientRegistry;
pub use rate_gate::RequestGate;
