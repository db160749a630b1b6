//! Back-off policy for transient Gemini failures.
//!
//! Quota exhaustion (429) and server errors are common with grounded calls,
//! so they are retried together with connection failures and timeouts.

use std::future::Future;
use std::time::Duration;

use crate::error::GeminiError;

const MAX_DELAY_MS: u64 = 30_000;

/// Whether `err` may succeed on a later attempt.
pub(crate) fn is_retriable(err: &GeminiError) -> bool {
    match err {
        GeminiError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GeminiError::Api { status, .. } => *status == 429 || (500..600).contains(status),
        GeminiError::Deserialize { .. }
        | GeminiError::EmptyResponse
        | GeminiError::InvalidBaseUrl { .. } => false,
    }
}

/// Delay before retry number `attempt` (1-based).
///
/// `base_ms * 2^(attempt-1)`, capped at 30 s, then scaled by `jitter`
/// (expected in `0.75..=1.25`).
pub(crate) fn backoff_delay(attempt: u32, base_ms: u64, jitter: f64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    let capped = base_ms.saturating_mul(1u64 << exponent).min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let millis = (capped as f64 * jitter) as u64;
    Duration::from_millis(millis)
}

/// Runs `operation`, retrying transient failures up to `max_retries` times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, GeminiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GeminiError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if attempt >= max_retries || !is_retriable(&err) {
            return Err(err);
        }
        attempt += 1;

        let delay = backoff_delay(attempt, backoff_base_ms, 0.75 + rand::random::<f64>() * 0.5);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient Gemini error, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
