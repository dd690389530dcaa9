// ABOUTME: Integration tests for sequential range syncs
// ABOUTME: Per-date failure isolation, auth and login aborts, and privacy block policies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{auth_failed, date, harness, harness_with, network_error, rate_limited, USER};
use serde_json::json;
use std::time::Duration;
use zhiji_core::errors::ErrorCode;
use zhiji_providers::DayResource;
use zhiji_server::config::{PrivacyBlockPolicy, SyncConfig};
use zhiji_server::sync::BatchAbortReason;

fn with_policy(privacy_policy: PrivacyBlockPolicy) -> SyncConfig {
    SyncConfig {
        privacy_policy,
        ..SyncConfig::default()
    }
}

#[tokio::test]
async fn test_failed_day_becomes_placeholder_and_batch_continues() -> Result<()> {
    let h = harness();
    let end = date(2024, 6, 14);
    let third = date(2024, 6, 10);
    h.api.fail_date(third, network_error());

    let outcome = h.service.sync_range(USER, end, 7, false).await?;

    assert!(outcome.is_complete());
    assert_eq!(outcome.records.len(), 7);
    let dates: Vec<_> = outcome.records.iter().map(|r| r.date).collect();
    assert_eq!(dates.first(), Some(&date(2024, 6, 8)));
    assert_eq!(dates.last(), Some(&end));
    assert!(dates.windows(2).all(|w| w[0] < w[1]));

    for record in &outcome.records {
        assert_eq!(record.has_data, record.date != third, "{}", record.date);
    }
    let placeholder = &outcome.records[2];
    assert!(placeholder.total_calories.abs() < f64::EPSILON);
    assert_eq!(placeholder.steps, 0);
    Ok(())
}

#[tokio::test]
async fn test_auth_failure_aborts_with_partial_results() -> Result<()> {
    let h = harness();
    let third = date(2024, 6, 10);
    h.api.fail_date(third, auth_failed());

    let outcome = h.service.sync_range(USER, date(2024, 6, 14), 7, false).await?;

    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.records.iter().all(|r| r.has_data));
    let abort = outcome.aborted.unwrap();
    assert_eq!(abort.reason, BatchAbortReason::AuthenticationExpired);
    assert_eq!(abort.date, third);
    assert_eq!(h.api.fetches_of(date(2024, 6, 11)), 0);
    Ok(())
}

#[tokio::test]
async fn test_login_rate_limit_aborts_before_first_date() -> Result<()> {
    let h = harness();
    h.api
        .queue_login_failures([rate_limited(), rate_limited(), rate_limited()]);

    let outcome = h.service.sync_range(USER, date(2024, 6, 14), 3, false).await?;

    assert!(outcome.records.is_empty());
    let abort = outcome.aborted.unwrap();
    assert_eq!(abort.reason, BatchAbortReason::RateLimited);
    assert_eq!(abort.date, date(2024, 6, 12));
    assert_eq!(h.api.login_count(), 3);
    assert_eq!(
        h.clock.sleeps(),
        vec![Duration::from_secs(30), Duration::from_secs(60)]
    );
    Ok(())
}

#[tokio::test]
async fn test_cached_dates_are_not_refetched() -> Result<()> {
    let h = harness();
    let middle = date(2024, 6, 13);
    h.service.sync_day(USER, middle, false).await?;

    let outcome = h.service.sync_range(USER, date(2024, 6, 14), 3, false).await?;

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(h.api.fetches_of(middle), 1);

    h.service.sync_range(USER, date(2024, 6, 14), 3, true).await?;
    assert_eq!(h.api.fetches_of(middle), 2);
    Ok(())
}

#[tokio::test]
async fn test_range_length_is_validated() {
    let h = harness();
    for days in [0, 32] {
        let err = h
            .service
            .sync_range(USER, date(2024, 6, 14), days, false)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
    assert_eq!(h.api.login_count(), 0);
}

#[tokio::test]
async fn test_privacy_block_treated_as_missing_by_default() -> Result<()> {
    let h = harness();
    let blocked = date(2024, 6, 13);
    h.api.respond(
        blocked,
        DayResource::Sleep,
        Ok(json!({ "privacyProtected": true })),
    );

    let outcome = h.service.sync_range(USER, date(2024, 6, 14), 3, false).await?;

    assert!(outcome.is_complete());
    let record = &outcome.records[1];
    assert!(record.has_data);
    assert_eq!(record.sleep.total_secs, 0);
    Ok(())
}

#[tokio::test]
async fn test_privacy_block_skip_date_policy() -> Result<()> {
    let h = harness_with(with_policy(PrivacyBlockPolicy::SkipDate));
    let blocked = date(2024, 6, 13);
    h.api.respond(
        blocked,
        DayResource::HeartRate,
        Ok(json!({ "privacyProtected": true })),
    );

    let outcome = h.service.sync_range(USER, date(2024, 6, 14), 3, false).await?;

    assert!(outcome.is_complete());
    assert_eq!(outcome.records.len(), 3);
    assert!(!outcome.records[1].has_data);
    assert!(outcome.records[2].has_data);
    Ok(())
}

#[tokio::test]
async fn test_privacy_block_abort_batch_policy() -> Result<()> {
    let h = harness_with(with_policy(PrivacyBlockPolicy::AbortBatch));
    let blocked = date(2024, 6, 13);
    h.api.respond(
        blocked,
        DayResource::HeartRate,
        Ok(json!({ "privacyProtected": true })),
    );

    let outcome = h.service.sync_range(USER, date(2024, 6, 14), 3, false).await?;

    assert_eq!(outcome.records.len(), 1);
    let abort = outcome.aborted.unwrap();
    assert_eq!(abort.reason, BatchAbortReason::PrivacyBlocked);
    assert_eq!(abort.date, blocked);
    assert!(abort.message.contains("heart_rate"));
    Ok(())
}

#[tokio::test]
async fn test_single_day_sync_ignores_abort_policy() -> Result<()> {
    let h = harness_with(with_policy(PrivacyBlockPolicy::AbortBatch));
    let blocked = date(2024, 6, 13);
    h.api.respond(
        blocked,
        DayResource::HeartRate,
        Ok(json!({ "privacyProtected": true })),
    );

    let record = h.service.sync_day(USER, blocked, false).await?;

    assert!(record.has_data);
    Ok(())
}
