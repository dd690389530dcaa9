// ABOUTME: Garmin day synchronization with a staleness-aware cache
// ABOUTME: Single-day and sequential range syncs with per-date failure isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

/// Daily automatic sync
pub mod auto;
/// Cached Garmin day records and the staleness policy
pub mod cache;
/// Sync orchestration
pub mod service;

pub use auto::{next_run_after, AutoSync, AutoSyncReport};
pub use cache::{SyncCache, SyncCacheEntry};
pub use service::{BatchAbort, BatchAbortReason, BatchSyncOutcome, SyncService};
