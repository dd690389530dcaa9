// ABOUTME: Food intake log stored as one list of records per user and date
// ABOUTME: Add, delete and list operations with per-key write serialization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use crate::store::Store;
use chrono::{FixedOffset, NaiveDate};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;
use zhiji_core::clock::Clock;
use zhiji_core::errors::{AppError, AppResult};
use zhiji_core::models::{FoodRecord, NewFoodRecord};

/// Food records of every user, keyed by day
#[derive(Clone)]
pub struct FoodLog {
    store: Store,
    clock: Arc<dyn Clock>,
    timezone: FixedOffset,
    write_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl FoodLog {
    /// Create a log; `timezone` decides the default date and time of new records
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>, timezone: FixedOffset) -> Self {
        Self {
            store,
            clock,
            timezone,
            write_locks: Arc::new(DashMap::new()),
        }
    }

    /// Records of one day in insertion order
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub async fn list(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<FoodRecord>> {
        let key = self.store.food_key(user_id, date);
        Ok(self
            .store
            .get_json::<Vec<FoodRecord>>(&key)
            .await?
            .unwrap_or_default())
    }

    /// Append a record; missing date and time default to the current local ones
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty description or invalid nutrient
    /// amounts, or a storage error
    pub async fn add(&self, user_id: &str, input: NewFoodRecord) -> AppResult<FoodRecord> {
        input.validate()?;
        let description = input.description.trim();
        if description.is_empty() {
            return Err(AppError::invalid_input("description must not be empty"));
        }

        let now = self.clock.now();
        let local = now.with_timezone(&self.timezone);
        let record = FoodRecord {
            id: Uuid::new_v4().to_string(),
            date: input.date.unwrap_or_else(|| local.date_naive()),
            time: input
                .time
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| local.format("%H:%M").to_string()),
            description: description.to_owned(),
            calories: input.calories,
            protein: input.protein,
            carbs: input.carbs,
            fat: input.fat,
            ai_advice: input.ai_advice,
            image_url: input.image_url,
            created_at: now,
        };

        let key = self.store.food_key(user_id, record.date);
        let added = record.clone();
        self.update(&key, move |records| {
            records.push(added);
            Ok(())
        })
        .await?;

        info!(user_id, date = %record.date, id = %record.id, calories = record.calories, "Food record added");
        Ok(record)
    }

    /// Remove a record and return it
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when no record with `id` exists on `date`
    pub async fn delete(&self, user_id: &str, date: NaiveDate, id: &str) -> AppResult<FoodRecord> {
        let key = self.store.food_key(user_id, date);
        let removed = self
            .update(&key, |records| {
                let position = records
                    .iter()
                    .position(|record| record.id == id)
                    .ok_or_else(|| AppError::not_found(format!("Food record {id} on {date}")))?;
                Ok(records.remove(position))
            })
            .await?;

        info!(user_id, %date, id, "Food record deleted");
        Ok(removed)
    }

    /// Read-modify-write of one day's list under that key's lock
    ///
    /// The lock entry is dropped again once no other writer holds it.
    async fn update<T, F>(&self, key: &str, change: F) -> AppResult<T>
    where
        T: Send,
        F: FnOnce(&mut Vec<FoodRecord>) -> AppResult<T> + Send,
    {
        let lock = self.lock_for(key);
        let result = {
            let _guard = lock.lock().await;
            self.rewrite(key, change).await
        };
        drop(lock);
        self.write_locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    async fn rewrite<T, F>(&self, key: &str, change: F) -> AppResult<T>
    where
        F: FnOnce(&mut Vec<FoodRecord>) -> AppResult<T>,
    {
        let mut records = self
            .store
            .get_json::<Vec<FoodRecord>>(key)
            .await?
            .unwrap_or_default();
        let outcome = change(&mut records)?;
        self.store.set_json(key, &records).await?;
        Ok(outcome)
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }
}
