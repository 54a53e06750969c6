//! Retry with exponential backoff for transient detail-page fetch errors.
//!
//! Only HTTP-level faults are retried. Browser commands and extraction
//! problems are returned on the first failure.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` is transient and worth another attempt.
///
/// Retriable: [`ScraperError::RateLimited`] (429), [`ScraperError::Http`]
/// (connection reset, timeout) and [`ScraperError::UnexpectedStatus`] with a
/// 5xx status. Everything else, including 404 and other 4xx codes, is final.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        _ => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries` times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds. With `max_retries = 3` the operation runs at most 4 times.
/// Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
