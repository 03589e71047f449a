use std::future::Future;
use tokio::time::{sleep, Duration};

use crate::error::Result;

/// Bounded retry for throttled requests: a fixed cooldown between attempts,
/// no exponential growth.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub cooldown: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, cooldown: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            cooldown,
        }
    }

    /// Retries carry no delay.
    pub fn immediate() -> Self {
        Self::new(2, Duration::ZERO)
    }

    pub async fn run<F, Fut, T>(&self, operation: &str, mut f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!("{} succeeded on attempt {}", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    tracing::warn!(
                        "Rate limited on {}, waiting {:?} before retry",
                        operation,
                        self.cooldown
                    );
                    sleep(self.cooldown).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(60))
    }
}

/// Proactive spacing of requests so the common case never hits the limit.
#[derive(Debug, Clone)]
pub struct PacingPolicy {
    pub between_repositories: Duration,
    pub between_requests: Duration,
}

impl PacingPolicy {
    pub fn none() -> Self {
        Self {
            between_repositories: Duration::ZERO,
            between_requests: Duration::ZERO,
        }
    }

    pub async fn before_repository(&self, name: &str) {
        if !self.between_repositories.is_zero() {
            tracing::debug!("Waiting {:?} before checking {}", self.between_repositories, name);
            sleep(self.between_repositories).await;
        }
    }

    pub async fn between_requests(&self) {
        if !self.between_requests.is_zero() {
            sleep(self.between_requests).await;
        }
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            between_repositories: Duration::from_secs(3),
            between_requests: Duration::from_secs(2),
        }
    }
}
