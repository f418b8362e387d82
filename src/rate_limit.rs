use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{sync::Mutex, time::Instant};
use tracing::trace;

/// Gate awaited before each outbound request.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn acquire(&self);
}

/// Waits `delay` before every request except the first one, so consecutive
/// requests are always separated by at least `delay`.
#[derive(Debug)]
pub struct FixedDelay {
    delay: Duration,
    primed: AtomicBool,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            primed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn acquire(&self) {
        if self.primed.swap(true, Ordering::SeqCst) && !self.delay.is_zero() {
            trace!(target: "lp_rewards::rate_limit", "sleeping {:?}", self.delay);
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Allows bursts of `capacity` requests and regains one slot every `refill`.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    refill: Duration,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            refill,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }
}

#[async_trait]
impl RateLimiter for TokenBucket {
    async fn acquire(&self) {
        if self.refill.is_zero() {
            return;
        }

        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();

                let elapsed = now.saturating_duration_since(state.last_refill);
                let gained = elapsed.as_nanos() / self.refill.as_nanos();
                if gained > 0 {
                    let room = (self.capacity - state.tokens) as u128;
                    state.tokens += gained.min(room) as u32;
                    state.last_refill = if state.tokens == self.capacity {
                        now
                    } else {
                        state.last_refill + self.refill * gained as u32
                    };
                }

                if state.tokens > 0 {
                    state.tokens -= 1;
                    return;
                }

                self.refill
                    .saturating_sub(now.saturating_duration_since(state.last_refill))
            };

            trace!(target: "lp_rewards::rate_limit", "bucket empty, sleeping {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}

/// Never waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&self) {}
}

/// Rate limit policy as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RateLimitConfig {
    FixedDelay { delay_ms: u64 },
    TokenBucket { capacity: u32, refill_ms: u64 },
    Disabled,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::FixedDelay { delay_ms: 1000 }
    }
}

impl RateLimitConfig {
    pub fn build(&self) -> Arc<dyn RateLimiter> {
        match *self {
            Self::FixedDelay { delay_ms } => {
                Arc::new(FixedDelay::new(Duration::from_millis(delay_ms)))
            }
            Self::TokenBucket {
                capacity,
                refill_ms,
            } => Arc::new(TokenBucket::new(capacity, Duration::from_millis(refill_ms))),
            Self::Disabled => Arc::new(Unlimited),
        }
    }
}
