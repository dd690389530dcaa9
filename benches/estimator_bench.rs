// ABOUTME: Criterion benchmarks for the normalization and estimation hot paths
// ABOUTME: Measures Garmin payload normalization, training classification and fat-change estimation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

//! Criterion benchmarks for normalization and estimation.
//!
//! Range syncs normalize one bundle per date and every food change runs the
//! estimator, so both are measured over realistic payload sizes.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use zhiji_core::intelligence::{classify, estimate};
use zhiji_core::models::{Activity, TrainingType};
use zhiji_providers::{normalize, RawBundle, RawPayload};

fn activity_list(count: usize) -> Value {
    let types = ["running", "indoor_cycling", "strength_training", "walking", "yoga"];
    Value::Array(
        (0..count)
            .map(|i| {
                json!({
                    "activityId": i,
                    "activityType": { "typeKey": types[i % types.len()] },
                    "duration": 1_800.0 + (i as f64) * 60.0,
                    "calories": 250.0,
                    "averageHR": 135,
                    "startTimeLocal": "2024-06-15 07:00:00"
                })
            })
            .collect(),
    )
}

fn bundle(activity_count: usize) -> RawBundle {
    let samples: Vec<Value> = (0..720).map(|i| json!([i * 120_000, 60 + i % 40])).collect();
    RawBundle {
        steps: RawPayload::parse(Value::Array(
            (0..96).map(|i| json!({ "steps": i * 10 })).collect(),
        )),
        heart_rate: RawPayload::parse(json!({
            "restingHeartRate": 52,
            "maxHeartRate": 171,
            "heartRateValues": samples
        })),
        sleep: RawPayload::parse(json!({ "dailySleepDTO": {
            "deepSleepSeconds": 5_400, "lightSleepSeconds": 14_400, "remSleepSeconds": 5_400
        }})),
        body_composition: RawPayload::parse(json!({ "totalAverage": { "weight": 72_500.0 } })),
        activities: RawPayload::parse(activity_list(activity_count)),
        stats: RawPayload::parse(json!({
            "totalKilocalories": 2_400.0,
            "activeKilocalories": 600.0,
            "bmrKilocalories": 1_800.0
        })),
        ..RawBundle::default()
    }
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    for count in [0_usize, 5, 50] {
        let raw = bundle(count);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("activities", count), &raw, |b, raw| {
            b.iter(|| normalize(black_box(date), black_box(raw), Utc::now()));
        });
    }

    group.bench_function("empty_bundle", |b| {
        let empty = RawBundle::default();
        b.iter(|| normalize(black_box(date), black_box(&empty), Utc::now()));
    });

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let activities: Vec<Activity> = (0..20)
        .map(|i| Activity {
            activity_type: if i % 2 == 0 { "trail_running" } else { "strength_training" }.to_owned(),
            duration_secs: 2_700.0,
            ..Activity::default()
        })
        .collect();

    c.bench_function("classify/20_activities", |b| {
        b.iter(|| classify(black_box(&activities)));
    });
}

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    let cases = [
        ("deficit", 1_500.0, 2_200.0),
        ("deep_deficit", 1_000.0, 2_600.0),
        ("surplus", 3_100.0, 2_200.0),
    ];

    for (name, calories_in, calories_out) in cases {
        group.bench_function(name, |b| {
            b.iter(|| {
                estimate(
                    black_box(calories_in),
                    black_box(calories_out),
                    black_box(TrainingType::Both),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_classify, bench_estimate);
criterion_main!(benches);
