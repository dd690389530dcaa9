// ABOUTME: Daily summary aggregation of food intake against Garmin expenditure
// ABOUTME: Recomputes and persists the per-day summary after food or sync changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

//! # Daily Summary Aggregator
//!
//! A summary combines three inputs for one user and date:
//!
//! - the macros of every food record logged that day
//! - the calories burned and training type from the cached Garmin record,
//!   or a configured default expenditure when no record with data exists
//! - the fat-change estimate derived from the two
//!
//! Summaries are persisted so reads are cheap; they are recomputed whenever
//! one of the inputs changes.

use crate::food::FoodLog;
use crate::store::Store;
use crate::sync::SyncCache;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};
use zhiji_core::clock::Clock;
use zhiji_core::constants::sync::MAX_SUMMARY_RANGE_DAYS;
use zhiji_core::errors::{AppError, AppResult};
use zhiji_core::intelligence::estimate;
use zhiji_core::models::{CaloriesOutSource, DailySummary, DayRecord, MacroTotals, TrainingType};

/// Builds and persists [`DailySummary`] values
#[derive(Clone)]
pub struct DailySummaryAggregator {
    store: Store,
    cache: SyncCache,
    food: FoodLog,
    clock: Arc<dyn Clock>,
    default_calories_out: f64,
}

impl DailySummaryAggregator {
    /// Create an aggregator over the shared store
    #[must_use]
    pub fn new(
        store: Store,
        cache: SyncCache,
        food: FoodLog,
        clock: Arc<dyn Clock>,
        default_calories_out: f64,
    ) -> Self {
        Self {
            store,
            cache,
            food,
            clock,
            default_calories_out,
        }
    }

    /// Recompute the summary from the food log and the cached Garmin record
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn recompute(&self, user_id: &str, date: NaiveDate) -> AppResult<DailySummary> {
        let cached = self
            .cache
            .get(user_id, date)
            .await?
            .map(|entry| entry.record)
            .filter(|record| record.has_data);
        self.compute_and_store(user_id, date, cached.as_ref()).await
    }

    /// Recompute using a freshly synced record instead of reading the cache
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn recompute_with_record(
        &self,
        user_id: &str,
        record: &DayRecord,
    ) -> AppResult<DailySummary> {
        let garmin = record.has_data.then_some(record);
        self.compute_and_store(user_id, record.date, garmin).await
    }

    /// Stored summary, computed and persisted on first read
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn get_daily_summary(&self, user_id: &str, date: NaiveDate) -> AppResult<DailySummary> {
        let key = self.store.summary_key(user_id, date);
        if let Some(summary) = self.store.get_json::<DailySummary>(&key).await? {
            return Ok(summary);
        }
        debug!(user_id, %date, "No stored summary, computing");
        self.recompute(user_id, date).await
    }

    /// Stored summaries between `start` and `end` inclusive, oldest first
    ///
    /// Dates without a stored summary are left out.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a reversed or oversized range, or a storage error
    pub async fn get_summary_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailySummary>> {
        if start > end {
            return Err(AppError::invalid_input(format!(
                "start date {start} is after end date {end}"
            )));
        }
        let span = (end - start).num_days() + 1;
        if span > MAX_SUMMARY_RANGE_DAYS {
            return Err(AppError::invalid_input(format!(
                "summary range of {span} days exceeds the maximum of {MAX_SUMMARY_RANGE_DAYS}"
            )));
        }

        let mut summaries = Vec::new();
        for date in start.iter_days().take_while(|date| *date <= end) {
            let key = self.store.summary_key(user_id, date);
            if let Some(summary) = self.store.get_json::<DailySummary>(&key).await? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    async fn compute_and_store(
        &self,
        user_id: &str,
        date: NaiveDate,
        garmin: Option<&DayRecord>,
    ) -> AppResult<DailySummary> {
        let records = self.food.list(user_id, date).await?;
        let totals = MacroTotals::sum(&records);

        let (calories_out, source, training) = garmin.map_or(
            (
                self.default_calories_out,
                CaloriesOutSource::Default,
                TrainingType::None,
            ),
            |record| {
                (
                    record.total_calories,
                    CaloriesOutSource::Garmin,
                    record.training_type,
                )
            },
        );

        let balance = estimate(totals.calories, calories_out, training);
        let summary = DailySummary {
            date,
            total_calories_in: totals.calories,
            total_protein: totals.protein,
            total_carbs: totals.carbs,
            total_fat: totals.fat,
            total_calories_out: calories_out,
            calories_out_source: source,
            training_type: training,
            fat_change_grams: balance.fat_change_grams,
            energy_balance: balance,
            food_record_count: records.len(),
            updated_at: self.clock.now(),
        };

        self.store
            .set_json(&self.store.summary_key(user_id, date), &summary)
            .await?;

        info!(
            user_id,
            %date,
            calories_in = summary.total_calories_in,
            calories_out = summary.total_calories_out,
            fat_change_grams = summary.fat_change_grams,
            "Daily summary updated"
        );
        Ok(summary)
    }
}

