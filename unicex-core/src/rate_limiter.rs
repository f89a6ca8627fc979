//! Client-side request throttle.
//!
//! A token bucket refilled continuously at one token per `interval`. Exchange
//! descriptions publish their limit as "milliseconds between requests"; the
//! pipeline turns that into a bucket with a small burst allowance and waits
//! on it before every transmit when rate limiting is enabled.
//!
//! ```rust
//! use unicex_core::rate_limiter::RateLimiter;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let limiter = RateLimiter::from_interval(Duration::from_millis(50));
//! limiter.acquire(1.0).await;
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Token bucket settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterConfig {
    /// Time it takes to earn one token
    pub interval: Duration,
    /// Bucket size; requests allowed back to back after an idle period
    pub capacity: f64,
}

impl RateLimiterConfig {
    /// One request per `interval`, with a burst of `capacity`.
    pub fn new(interval: Duration, capacity: f64) -> Self {
        Self {
            interval,
            capacity: capacity.max(1.0),
        }
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 1.0)
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
    config: RateLimiterConfig,
}

impl BucketState {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        self.last_refill = now;

        if self.config.interval.is_zero() {
            self.tokens = self.config.capacity;
            return;
        }
        let earned = elapsed.as_secs_f64() / self.config.interval.as_secs_f64();
        self.tokens = (self.tokens + earned).min(self.config.capacity);
    }

    fn try_consume(&mut self, cost: f64) -> bool {
        self.refill();
        if self.tokens >= cost {
            self.tokens -= cost;
            true
        } else {
            false
        }
    }

    fn wait_time(&self, cost: f64) -> Duration {
        let missing = (cost - self.tokens).max(0.0);
        self.config.interval.mul_f64(missing)
    }
}

/// Shared token bucket; clones share state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<BucketState>>,
}

impl RateLimiter {
    /// Creates a full bucket.
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(BucketState {
                tokens: config.capacity,
                last_refill: Instant::now(),
                config,
            })),
        }
    }

    /// A bucket spacing requests `interval` apart, with no burst.
    pub fn from_interval(interval: Duration) -> Self {
        Self::new(RateLimiterConfig::new(interval, 1.0))
    }

    /// Waits until `cost` tokens are available, then takes them.
    ///
    /// A cost above the capacity is clamped so the call cannot wait forever.
    pub async fn acquire(&self, cost: f64) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let cost = cost.min(state.config.capacity);
                if state.try_consume(cost) {
                    return;
                }
                state.wait_time(cost)
            };
            sleep(wait.max(Duration::from_millis(1))).await;
        }
    }

    /// Takes `cost` tokens if they are available right now.
    pub async fn try_acquire(&self, cost: f64) -> bool {
        self.state.lock().await.try_consume(cost)
    }

    /// Tokens currently available.
    pub async fn available(&self) -> f64 {
        let mut state = self.state.lock().await;
        state.refill();
        state.tokens
    }
}
