// ABOUTME: Garmin Connect integration module
// ABOUTME: API seam, HTTP implementation, session client, fetcher, payload parser and normalizer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

/// Provider seam and session types
pub mod api;

/// Per-user credentialed client
pub mod client;

/// Per-day raw resource fetcher
pub mod fetcher;

/// reqwest implementation of the provider seam
pub mod http;

/// Raw payload to `DayRecord` conversion
pub mod normalizer;

/// Discriminated parser for raw payload shapes
pub mod payload;

/// Per-user client registry
pub mod registry;
