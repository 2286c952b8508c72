use std::{fmt::Display, future::Future, time::Duration};

/// Errors which know whether repeating the failed operation could succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = attempt once).
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (starting at 1): base * 2^(retry-1),
    /// capped at `max_delay`.
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T, E>
    where
        E: Transient + Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut retry = 0;
        loop {
            match attempt().await {
                Ok(value) => {
                    if retry > 0 {
                        log::info!("{operation} succeeded after {retry} retries");
                    }
                    return Ok(value);
                }
                Err(why) if why.is_transient() && retry < self.max_retries => {
                    retry += 1;
                    let delay = self.delay(retry);
                    log::warn!(
                        "{operation} failed ({why}), retry {retry}/{} in {delay:?}",
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(why) => {
                    if why.is_transient() {
                        log::error!(
                            "{operation} failed after {} attempts: {why}",
                            retry + 1
                        );
                    }
                    return Err(why);
                }
            }
        }
    }
}
