// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authenticated Request Client
//!
//! Thin wrapper over `reqwest` that every backend call goes through.
//!
//! ## Policy
//!
//! - Bearer header attached when the credential source holds a token
//! - Fixed attempt count with a fixed delay between attempts; no backoff,
//!   no jitter, no circuit breaking
//! - 404 is final, never retried
//! - A 2xx that is not JSON is a formatting error, never retried

pub mod client;

#[cfg(test)]
pub(crate) mod test_server;

use std::time::Duration;

pub use client::{unwrap_envelope, RequestClient};

/// Default total attempts per request.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, DEFAULT_DELAY)
    }
}

/// Supplies the bearer credential for outgoing requests.
pub trait CredentialSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts, 1);
        assert_eq!(RetryPolicy::none().attempts, 1);
    }

    #[test]
    fn default_policy_is_three_attempts_one_second_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }
}
