// ABOUTME: Environment-only configuration for the Zhiji server
// ABOUTME: Groups Garmin client, sync policy, store and default account settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

/// Top-level server configuration assembled from the environment
pub mod environment;

/// Key-value store backend configuration
pub mod store;

/// Sync staleness and batch policy configuration
pub mod sync;

pub use environment::{DefaultAccountConfig, ServerConfig};
pub use store::{RedisConnectionConfig, StoreConfig};
pub use sync::{PrivacyBlockPolicy, SyncConfig};
