// ABOUTME: Provider error taxonomy for Garmin Connect calls
// ABOUTME: Classifies failures into authentication, rate limit, transient and permanent errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use thiserror::Error;

/// Errors raised while talking to the fitness provider
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Credentials rejected or session expired
    #[error("{provider} authentication failed: {reason}")]
    AuthenticationFailed {
        /// Provider name
        provider: String,
        /// Reason reported by the provider
        reason: String,
    },

    /// Provider is throttling this session
    #[error("{provider} rate limit exceeded ({limit_type}), retry after {retry_after_secs}s")]
    RateLimitExceeded {
        /// Provider name
        provider: String,
        /// Seconds the caller should wait before trying again
        retry_after_secs: u64,
        /// Which limit was hit (login, api)
        limit_type: String,
    },

    /// Connection could not be established or was dropped
    #[error("{provider} network error: {message}")]
    Network {
        /// Provider name
        provider: String,
        /// Underlying transport message
        message: String,
    },

    /// Call did not complete within its time budget
    #[error("{provider} request timed out after {timeout_secs}s")]
    Timeout {
        /// Provider name
        provider: String,
        /// Budget that was exceeded
        timeout_secs: u64,
    },

    /// Provider answered with a non-success status
    #[error("{provider} API error ({status_code}): {message}")]
    ApiError {
        /// Provider name
        provider: String,
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
        /// Whether retrying may succeed
        retryable: bool,
    },

    /// Response body could not be decoded
    #[error("{provider} returned an unreadable payload: {message}")]
    InvalidResponse {
        /// Provider name
        provider: String,
        /// Decoder message
        message: String,
    },

    /// Client is misconfigured (missing credentials, bad URL)
    #[error("{provider} configuration error: {details}")]
    ConfigurationError {
        /// Provider name
        provider: String,
        /// What is wrong
        details: String,
    },
}

impl ProviderError {
    /// Whether a login retry may succeed after waiting
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded { .. } | Self::Network { .. } | Self::Timeout { .. } => true,
            Self::ApiError { retryable, .. } => *retryable,
            Self::AuthenticationFailed { .. }
            | Self::InvalidResponse { .. }
            | Self::ConfigurationError { .. } => false,
        }
    }

    /// Whether the session is no longer usable
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Retry hint carried by rate-limit errors
    #[must_use]
    pub const fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimitExceeded {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

/// Result alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let timeout = ProviderError::Timeout {
            provider: "garmin".to_owned(),
            timeout_secs: 30,
        };
        let server = ProviderError::ApiError {
            provider: "garmin".to_owned(),
            status_code: 503,
            message: "unavailable".to_owned(),
            retryable: true,
        };
        let auth = ProviderError::AuthenticationFailed {
            provider: "garmin".to_owned(),
            reason: "bad password".to_owned(),
        };

        assert!(timeout.is_retryable());
        assert!(server.is_retryable());
        assert!(!auth.is_retryable());
        assert!(auth.is_authentication());
        assert_eq!(auth.retry_after_secs(), None);
    }
}
