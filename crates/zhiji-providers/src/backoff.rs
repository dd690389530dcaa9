// ABOUTME: Login retry policy for the Garmin client
// ABOUTME: Escalating waits on rate limits, fixed waits on transient failures, no retry on bad credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use std::time::Duration;
use zhiji_core::constants::garmin::{
    DEFAULT_LOGIN_MAX_ATTEMPTS, DEFAULT_RATE_LIMIT_BACKOFF_SECS, DEFAULT_TRANSIENT_BACKOFF_SECS,
};
use zhiji_core::errors::ProviderError;

/// How long to wait between login attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Rate-limit wait is `attempt * rate_limit_step`
    pub rate_limit_step: Duration,
    /// Wait after network, timeout or 5xx failures
    pub transient_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_LOGIN_MAX_ATTEMPTS,
            rate_limit_step: Duration::from_secs(DEFAULT_RATE_LIMIT_BACKOFF_SECS),
            transient_delay: Duration::from_secs(DEFAULT_TRANSIENT_BACKOFF_SECS),
        }
    }
}

impl BackoffPolicy {
    /// Delay before the attempt following failed `attempt` (1-based)
    ///
    /// Returns `None` when the error is not retryable or the attempts are used up.
    #[must_use]
    pub fn delay_after(&self, attempt: u32, error: &ProviderError) -> Option<Duration> {
        if attempt >= self.max_attempts || !error.is_retryable() {
            return None;
        }

        match error {
            ProviderError::RateLimitExceeded { .. } => Some(self.rate_limit_step * attempt),
            _ => Some(self.transient_delay),
        }
    }
}
