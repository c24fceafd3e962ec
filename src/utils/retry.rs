//! Retry utilities with exponential backoff for resilient API calls.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Time limit for a single attempt
    pub attempt_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            attempt_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    /// Set the number of attempts
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the delay before the first retry
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Backoff delay after `attempt` failed attempts
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        let secs = (self.initial_delay.as_secs_f64() * factor).min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Retry settings matching arXiv's published API etiquette: a few
/// attempts spaced at least three seconds apart.
pub fn arxiv_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 5,
        initial_delay: Duration::from_secs(3),
        max_delay: Duration::from_secs(60),
        backoff_multiplier: 2.0,
        attempt_timeout: Duration::from_secs(60),
    }
}

/// Transient errors that should trigger a retry
#[derive(Debug, Clone, PartialEq)]
pub enum TransientError {
    /// Network connectivity issues
    Network,
    /// Rate limit exceeded
    RateLimit,
    /// Server side failure (5xx)
    ServerError,
    /// Attempt exceeded its time limit
    Timeout,
}

impl TransientError {
    /// Classify a SourceError; `None` means the error is permanent
    pub fn from_source_error(err: &SourceError) -> Option<Self> {
        match err {
            SourceError::RateLimit => Some(TransientError::RateLimit),
            SourceError::Network(_) => Some(TransientError::Network),
            SourceError::Api(msg) => {
                let msg = msg.to_lowercase();
                if msg.contains("status: 5") || msg.contains("unavailable") {
                    Some(TransientError::ServerError)
                } else {
                    None
                }
            }
            // TLS failures do not heal on retry
            SourceError::Certificate(_) => None,
            _ => None,
        }
    }

    /// Minimum delay before retrying this kind of failure
    pub fn recommended_delay(&self) -> Duration {
        match self {
            TransientError::RateLimit => Duration::from_secs(10),
            TransientError::ServerError => Duration::from_secs(5),
            TransientError::Network | TransientError::Timeout => Duration::ZERO,
        }
    }
}

/// Execute an async operation, retrying transient failures with
/// exponential backoff.
///
/// Permanent errors are returned immediately; the last transient error is
/// returned once attempts are exhausted.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let (error, transient) = match timeout(config.attempt_timeout, operation()).await {
            Ok(Ok(value)) => {
                if attempt > 1 {
                    tracing::info!("Request succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Ok(Err(error)) => match TransientError::from_source_error(&error) {
                Some(transient) => (error, transient),
                None => return Err(error),
            },
            Err(_) => (
                SourceError::Network("Request timed out".to_string()),
                TransientError::Timeout,
            ),
        };

        if attempt >= config.max_attempts {
            tracing::warn!("Giving up after {} attempts: {}", attempt, error);
            return Err(error);
        }

        let delay = config.backoff(attempt).max(transient.recommended_delay());
        tracing::debug!(
            "Transient error on attempt {}/{} ({:?}), retrying in {:?}",
            attempt,
            config.max_attempts,
            transient,
            delay
        );
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fast_config(attempts: u32) -> RetryConfig {
        RetryConfig::default()
            .max_attempts(attempts)
            .initial_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_retry_success_first_try() {
        let calls = Rc::new(RefCell::new(0));

        let result = {
            let calls = calls.clone();
            with_retry(fast_config(3), move || {
                let calls = calls.clone();
                async move {
                    *calls.borrow_mut() += 1;
                    Ok("success")
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let calls = Rc::new(RefCell::new(0));

        let result = {
            let calls = calls.clone();
            with_retry(fast_config(4), move || {
                let calls = calls.clone();
                async move {
                    *calls.borrow_mut() += 1;
                    if *calls.borrow() < 3 {
                        Err(SourceError::Network("connection reset".to_string()))
                    } else {
                        Ok("success")
                    }
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let calls = Rc::new(RefCell::new(0));

        let result: Result<(), SourceError> = {
            let calls = calls.clone();
            with_retry(fast_config(2), move || {
                let calls = calls.clone();
                async move {
                    *calls.borrow_mut() += 1;
                    Err(SourceError::Network("down".to_string()))
                }
            })
        }
        .await;

        assert!(matches!(result, Err(SourceError::Network(_))));
        assert_eq!(*calls.borrow(), 2);
    }

    #[tokio::test]
    async fn test_certificate_errors_are_not_retried() {
        let calls = Rc::new(RefCell::new(0));

        let result: Result<(), SourceError> = {
            let calls = calls.clone();
            with_retry(fast_config(5), move || {
                let calls = calls.clone();
                async move {
                    *calls.borrow_mut() += 1;
                    Err(SourceError::Certificate("self-signed certificate".to_string()))
                }
            })
        }
        .await;

        assert!(matches!(result, Err(SourceError::Certificate(_))));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_transient_error_detection() {
        assert!(TransientError::from_source_error(&SourceError::RateLimit).is_some());
        assert!(
            TransientError::from_source_error(&SourceError::Network("refused".into())).is_some()
        );
        assert!(TransientError::from_source_error(&SourceError::Api(
            "arXiv API returned status: 503 Service Unavailable".into()
        ))
        .is_some());
        assert!(TransientError::from_source_error(&SourceError::Parse("bad xml".into())).is_none());
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let config = arxiv_retry_config();
        assert_eq!(config.backoff(1), Duration::from_secs(3));
        assert_eq!(config.backoff(2), Duration::from_secs(6));
        assert_eq!(config.backoff(10), Duration::from_secs(60));
    }
}
