//! Per-endpoint and per-venue token-bucket rate limiter (spec §4.3, component C3).
//!
//! Each venue owns one [`RateLimiter`] carrying a bucket per logical endpoint class plus a
//! second, shared bucket capping the venue's global requests-per-second. `acquire_permit` waits
//! until both buckets have a token, or fails fast with [`SocketError::RateLimitDeadlineExceeded`]
//! if the wait would exceed the caller's deadline. `release_permit` is a no-op kept only for API
//! symmetry - strict token-bucket rate limiting never "gives back" a token early.

use crate::error::SocketError;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

/// Requests-per-second and burst-capacity configuration for one venue.
///
/// Constructed once at façade construction time; [`RateLimiterConfig::validate`] enforces the
/// HFT bound from spec §4.3: `requests_per_second ∈ (0, 1000]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RateLimiterConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

impl RateLimiterConfig {
    pub fn validate(self) -> Result<Self, SocketError> {
        if self.requests_per_second == 0 || self.requests_per_second > 1000 {
            return Err(SocketError::Unsupported {
                entity: "RateLimiterConfig",
                item: format!(
                    "requests_per_second must be in (0, 1000], got {}",
                    self.requests_per_second
                ),
            });
        }
        Ok(self)
    }
}

/// A single token bucket: `capacity` tokens, refilled continuously at `refill_per_sec`.
#[derive(Debug)]
struct Bucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    updated_at: Instant,
}

impl Bucket {
    fn new(config: RateLimiterConfig) -> Self {
        let capacity = (config.requests_per_second + config.burst) as f64;
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec: config.requests_per_second as f64,
            updated_at: Instant::now(),
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.updated_at).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.updated_at = now;
    }

    /// Duration until at least one token is available, `None` if already available.
    fn wait_for_token(&mut self) -> Option<Duration> {
        self.refill(Instant::now());
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            None
        } else {
            let deficit = 1.0 - self.tokens;
            self.tokens = 0.0;
            Some(Duration::from_secs_f64(deficit / self.refill_per_sec))
        }
    }
}

/// Per-venue token-bucket rate limiter: one bucket per endpoint class, plus a shared venue-wide
/// bucket. Both must yield a token before [`RateLimiter::acquire_permit`] returns.
#[derive(Debug)]
pub struct RateLimiter {
    venue: Mutex<Bucket>,
    endpoints: Mutex<HashMap<String, Bucket>>,
    endpoint_default: RateLimiterConfig,
}

impl RateLimiter {
    /// Construct a new [`Self`] with the given venue-wide `config` (validated per §4.3) and the
    /// default config applied to any endpoint class not explicitly configured via
    /// [`Self::with_endpoint`].
    pub fn new(config: RateLimiterConfig) -> Result<Self, SocketError> {
        let config = config.validate()?;
        Ok(Self {
            venue: Mutex::new(Bucket::new(config)),
            endpoints: Mutex::new(HashMap::new()),
            endpoint_default: config,
        })
    }

    /// Configure a distinct bucket for a specific endpoint class (eg/ "place_order" vs.
    /// "get_orderbook") ahead of first use.
    pub fn with_endpoint(
        self,
        endpoint: impl Into<String>,
        config: RateLimiterConfig,
    ) -> Result<Self, SocketError> {
        let config = config.validate()?;
        self.endpoints
            .lock()
            .insert(endpoint.into(), Bucket::new(config));
        Ok(self)
    }

    /// Acquire a permit for `endpoint`, blocking until a token is available in both the
    /// endpoint-class bucket and the shared venue bucket. Fails fast with `rateLimit` if the
    /// combined wait would exceed `deadline`.
    pub async fn acquire_permit(
        &self,
        endpoint: &str,
        deadline: Duration,
    ) -> Result<(), SocketError> {
        let start = Instant::now();
        let mut endpoint_granted = false;
        let mut venue_granted = false;

        loop {
            let endpoint_wait = if endpoint_granted {
                None
            } else {
                let mut endpoints = self.endpoints.lock();
                let bucket = endpoints
                    .entry(endpoint.to_string())
                    .or_insert_with(|| Bucket::new(self.endpoint_default));
                match bucket.wait_for_token() {
                    None => {
                        endpoint_granted = true;
                        None
                    }
                    wait => wait,
                }
            };

            let venue_wait = if venue_granted {
                None
            } else {
                match self.venue.lock().wait_for_token() {
                    None => {
                        venue_granted = true;
                        None
                    }
                    wait => wait,
                }
            };

            if endpoint_granted && venue_granted {
                return Ok(());
            }

            let wait = endpoint_wait.into_iter().chain(venue_wait).max().unwrap();

            if start.elapsed() + wait > deadline {
                return Err(SocketError::RateLimitDeadlineExceeded(endpoint.to_string()));
            }

            tokio::time::sleep(wait).await;
        }
    }

    /// No-op kept for API symmetry with [`Self::acquire_permit`] - strict token-bucket limiting
    /// never returns a token early (spec §4.3).
    pub fn release_permit(&self, _endpoint: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquires_permit_within_burst_capacity_immediately() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            requests_per_second: 10,
            burst: 5,
        })
        .unwrap();

        for _ in 0..15 {
            limiter
                .acquire_permit("get_orderbook", Duration::from_millis(1))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn fails_fast_once_bucket_exhausted_and_deadline_tiny() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            requests_per_second: 1,
            burst: 0,
        })
        .unwrap();

        limiter
            .acquire_permit("x", Duration::from_millis(1))
            .await
            .unwrap();

        let result = limiter.acquire_permit("x", Duration::from_millis(1)).await;
        assert!(matches!(
            result,
            Err(SocketError::RateLimitDeadlineExceeded(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_rps() {
        assert!(RateLimiter::new(RateLimiterConfig {
            requests_per_second: 0,
            burst: 0,
        })
        .is_err());

        assert!(RateLimiter::new(RateLimiterConfig {
            requests_per_second: 1001,
            burst: 0,
        })
        .is_err());
    }
}
