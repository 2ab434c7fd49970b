//! Bounded retry with randomized exponential backoff.

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::ProviderError;

/// Final error of a retried call, with how many attempts were made.
#[derive(Debug)]
pub struct Exhausted {
    pub attempts: u32,
    pub last: ProviderError,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    /// 0.0 gives a fixed, reproducible delay sequence.
    pub randomization_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(60),
            multiplier: 2.0,
            randomization_factor: 0.5,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_intervals(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_interval = initial;
        self.max_interval = max.max(initial);
        self
    }

    pub fn with_randomization(mut self, factor: f64) -> Self {
        self.randomization_factor = factor.clamp(0.0, 1.0);
        self
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_multiplier(self.multiplier)
            .with_randomization_factor(self.randomization_factor)
            .with_max_elapsed_time(None)
            .build()
    }

    // Jitter may push past either bound; keep every sleep inside them.
    fn next_delay(&self, backoff: &mut ExponentialBackoff) -> Duration {
        backoff
            .next_backoff()
            .unwrap_or(self.max_interval)
            .clamp(self.initial_interval, self.max_interval)
    }

    /// Delays slept between attempts, in order (`max_attempts - 1` of them).
    pub fn delays(&self) -> Vec<Duration> {
        let mut backoff = self.backoff();
        (1..self.max_attempts)
            .map(|_| self.next_delay(&mut backoff))
            .collect()
    }

    /// Run `operation` until it succeeds, fails permanently or runs out of attempts.
    /// Sleeps are async, so only the calling task waits.
    pub async fn execute<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, Exhausted>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut backoff = self.backoff();
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self.next_delay(&mut backoff);
                    warn!(
                        call = label,
                        attempt,
                        max_attempts = self.max_attempts,
                        retry_in = ?delay,
                        error = %err,
                        "Call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(Exhausted {
                        attempts: attempt,
                        last: err,
                    })
                }
            }
        }
    }
}
