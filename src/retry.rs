use std::{future::Future, num::NonZeroUsize, time::Duration};

use kube::Error as KubeError;
use tokio::time::sleep;
use tracing::debug;

/// Retry policy the fetcher applies to API requests.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts including the first call.
    pub max_attempts: NonZeroUsize,
    /// Wait before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for the exponential backoff.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: NonZeroUsize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self::default().with_max_attempts(NonZeroUsize::MIN)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroUsize::new(3).unwrap_or(NonZeroUsize::MIN),
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
        }
    }
}

/// Whether a failed request is worth repeating.
///
/// API errors are retried only on `408`, `429` and `5xx`; transport level
/// failures are always retried. Kubeconfig and auth errors never are.
pub fn is_transient(error: &KubeError) -> bool {
    match error {
        KubeError::Api(response) => is_transient_status(response.code),
        KubeError::HyperError(_) | KubeError::Service(_) => true,
        _ => false,
    }
}

/// HTTP status codes that signal a temporary server side condition.
pub fn is_transient_status(code: u16) -> bool {
    matches!(code, 408 | 429 | 500..=599)
}

/// Run `operation` until it succeeds, fails with a non-transient error,
/// or `policy.max_attempts` is exhausted. The last error is returned as is.
pub async fn retry_with_policy<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, KubeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, KubeError>>,
{
    let mut backoff = policy.initial_backoff.min(policy.max_backoff);
    let mut attempt = 0usize;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < policy.max_attempts.get() && is_transient(&error) => {
                debug!(attempt, ?backoff, %error, "request failed, retrying");
                sleep(backoff).await;
                backoff = (backoff * 2).min(policy.max_backoff);
            }
            Err(error) => return Err(error),
        }
    }
}
