//! Retrying REST call driver sitting above [`xt_core::protocol::http::rest::client::RestClient`]
//! (spec C7, §4.5): acquires a rate-limit permit, executes, and retries classified-retryable
//! failures with exponential backoff, honouring a server-supplied `retryAfter` hint and forcing
//! exactly one retry (with a signer timestamp refresh) on `requestExpired`.

use crate::error::{ClientError, ExchangeErrorKind};
use std::time::Duration;
use xt_core::{
    protocol::http::{BuildStrategy, HttpParser, rest::RestRequest, rest::client::RestClient},
    ratelimit::RateLimiter,
};

/// Retry schedule: exponential `base · 2^(attempt-1)` capped at `max_delay`, up to `max_attempts`
/// total attempts (spec §4.5).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Deadline passed to [`RateLimiter::acquire_permit`] for each attempt's permit wait.
    pub rate_limit_deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            rate_limit_deadline: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let scaled = self.base_delay.saturating_mul(1u32 << exponent);
        scaled.min(self.max_delay)
    }
}

/// Execute `request` against `client`, acquiring a rate-limit permit from `rate_limiter` on every
/// attempt and retrying per `policy` on classified-retryable [`ClientError`]s. `refresh_timestamp`
/// is invoked exactly once, immediately before the retry attempt, when the failure classifies as
/// `requestExpired` (spec §4.4 `refreshTimestamp` hook).
pub async fn execute_with_retry<Strategy, Parser, Request>(
    client: &RestClient<'_, Strategy, Parser>,
    rate_limiter: &RateLimiter,
    refresh_timestamp: impl Fn(),
    record_latency: impl Fn(Duration),
    request: Request,
    policy: RetryPolicy,
) -> Result<Request::Response, ClientError>
where
    Strategy: BuildStrategy,
    Parser: HttpParser<OutputError = ClientError>,
    Request: RestRequest + Clone,
{
    let endpoint = request.rate_limit_key().into_owned();
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        rate_limiter
            .acquire_permit(&endpoint, policy.rate_limit_deadline)
            .await
            .map_err(ClientError::from)?;

        let outcome = client.execute(request.clone()).await;
        rate_limiter.release_permit(&endpoint);

        let error = match outcome {
            Ok((response, latency)) => {
                let duration_ms = latency
                    .fields
                    .iter()
                    .find(|field| field.key == "duration")
                    .map(|field| field.value)
                    .unwrap_or_default();
                record_latency(Duration::from_millis(duration_ms));
                return Ok(response);
            }
            Err(error) => error,
        };

        let exhausted = attempt >= policy.max_attempts;
        if exhausted || !error.is_retryable() {
            return Err(error);
        }

        if let ClientError::Exchange(exchange_error) = &error {
            if exchange_error.kind == ExchangeErrorKind::RequestExpired {
                refresh_timestamp();
            }
        }

        tokio::time::sleep(retry_delay(&error, attempt, &policy)).await;
    }
}

fn retry_delay(error: &ClientError, attempt: u32, policy: &RetryPolicy) -> Duration {
    let backoff = policy.backoff_for_attempt(attempt);

    match error {
        ClientError::Exchange(exchange_error) => match exchange_error.retry_after_ms {
            Some(ms) => backoff.max(Duration::from_millis(ms)),
            None => backoff,
        },
        ClientError::Connectivity(_) => backoff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps_at_max_delay() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            rate_limit_deadline: Duration::from_secs(1),
        };

        assert_eq!(policy.backoff_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.backoff_for_attempt(4), Duration::from_millis(500));
    }
}
