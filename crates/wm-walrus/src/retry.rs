//! Backoff for Walrus HTTP calls.
//!
//! Only transport failures (connection refused, timeouts) are retried.
//! A response with any status, including 5xx, goes straight back to the
//! caller.

use std::time::Duration;

/// Retries after the first attempt.
pub(crate) const MAX_RETRIES: u32 = 3;

/// First retry delay; doubles each time (200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Call `f` until it yields a response or `MAX_RETRIES` retries are spent.
pub(crate) async fn retry_send<F, Fut>(
    operation: &str,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < MAX_RETRIES => {
                let delay = Duration::from_millis(BASE_DELAY_MS << attempt);
                attempt += 1;
                tracing::warn!(
                    operation,
                    attempt,
                    max_retries = MAX_RETRIES,
                    "storage request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn closed_port_is_tried_four_times() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let result = retry_send("GET /v1/blobs", || {
            counter.fetch_add(1, Ordering::SeqCst);
            http.get("http://127.0.0.1:1/v1/blobs/x").send()
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES + 1);
    }
}
