use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, warn};

use crate::constants::{FETCH_ATTEMPTS, FETCH_BACKOFF_MS, HTTP_TIMEOUT_SECS};
use crate::errors::{BotError, Result};

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: FETCH_ATTEMPTS,
            backoff: Duration::from_millis(FETCH_BACKOFF_MS),
            attempt_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }
}

impl RetryPolicy {
    /// Run `operation` up to `attempts` times. Non-transient errors stop the loop early.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                warn!(
                    "Retrying operation '{}' (attempt {}/{})",
                    operation_name, attempt, attempts
                );
                tokio::time::sleep(self.backoff).await;
            }

            match timeout(self.attempt_timeout, operation()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) if !e.is_transient() => return Err(e),
                Ok(Err(e)) => {
                    warn!("Operation '{}' failed: {}", operation_name, e);
                    last_error = Some(e);
                }
                Err(_) => {
                    warn!(
                        "Operation '{}' timed out after {:?}",
                        operation_name, self.attempt_timeout
                    );
                    last_error = Some(BotError::api(format!(
                        "Operation '{}' timed out after {} seconds",
                        operation_name,
                        self.attempt_timeout.as_secs()
                    )));
                }
            }
        }

        error!("Operation '{}' failed after {} attempts", operation_name, attempts);
        Err(last_error.unwrap_or_else(|| BotError::api(format!("{} failed", operation_name))))
    }
}
