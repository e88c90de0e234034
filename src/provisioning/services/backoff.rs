//! Exponential backoff around fallible async operations.

use std::future::Future;
use tracing::debug;

use crate::provisioning::domain::BackoffPolicy;

/// Runs `operation` until it succeeds, `should_retry` rejects the error, or
/// the policy's retries are spent. Returns the last error in the latter
/// cases.
///
/// # Errors
///
/// Returns the error from the final attempt.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: &BackoffPolicy,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut retry = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retry < policy.max_retries && should_retry(&err) => {
                let delay = policy.delay_for(retry);
                debug!(retry, delay_ms = delay.as_millis(), error = %err, "retrying after backoff");
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
