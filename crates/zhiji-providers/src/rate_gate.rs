// ABOUTME: Minimum-interval gate serializing every outbound call of one Garmin session
// ABOUTME: Waits on an injectable clock so throttling is testable without real delays
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use zhiji_core::clock::Clock;

/// Enforces `now - last_request >= min_interval` before each call
///
/// The lock is held across the wait, so concurrent callers queue up and are
/// released one interval apart.
pub struct RequestGate {
    min_interval: Duration,
    last_request: Mutex<Option<DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl RequestGate {
    /// Create a gate that has not seen any request yet
    #[must_use]
    pub fn new(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
            clock,
        }
    }

    /// Wait for the gate to open, then mark a request as sent
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = (self.clock.now() - previous)
                .to_std()
                .unwrap_or(Duration::ZERO);
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis(), "Request gate throttling call");
                self.clock.sleep(wait).await;
            }
        }

        *last = Some(self.clock.now());
    }

    /// Configured spacing
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use zhiji_core::clock::ManualClock;

    #[tokio::test]
    async fn test_first_call_passes_immediately() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        let gate = RequestGate::new(Duration::from_secs(2), clock.clone());

        gate.acquire().await;

        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_back_to_back_calls_wait_the_remainder() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        let gate = RequestGate::new(Duration::from_secs(2), clock.clone());

        gate.acquire().await;
        clock.advance(Duration::from_millis(500));
        gate.acquire().await;
        gate.acquire().await;

        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(1500), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_no_wait_after_interval_elapsed() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        let gate = RequestGate::new(Duration::from_secs(2), clock.clone());

        gate.acquire().await;
        clock.advance(Duration::from_secs(3));
        gate.acquire().await;

        assert!(clock.sleeps().is_empty());
    }
}
