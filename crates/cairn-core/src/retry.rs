// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry policy for reads of externally written state.
//!
//! The policy is a plain value rather than a loop baked into call sites, so
//! delay math and retryability decisions can be tested on their own.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::CairnError;

/// Attempts, backoff base, and which errors are worth retrying.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first; treated as at least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles with each retry.
    pub base_delay: Duration,
    pub is_retryable: fn(&CairnError) -> bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        RetryPolicy {
            max_attempts,
            base_delay,
            is_retryable: transient,
        }
    }

    /// Delay inserted after failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_millis(100))
    }
}

/// Default retryability: backend failures are transient; domain errors and
/// absent data are not.
pub fn transient(err: &CairnError) -> bool {
    matches!(err, CairnError::Backend { .. })
}

/// Run `op` under `policy`, sleeping between attempts.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, CairnError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CairnError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= policy.max_attempts || !(policy.is_retryable)(&err) {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt - 1);
                debug!(attempt, ?delay, "retrying after error: {err}");
                tokio::time::sleep(delay).await;
            }
        }
    }
}
