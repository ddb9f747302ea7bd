//! Retry policy for requests that time out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How many times a timed-out request is re-sent, and how long to wait between sends.
///
/// Only timeouts are retried. An error-status or a malformed reply is final.
///
/// ```
/// use mibwalk::session::Retry;
/// use std::time::Duration;
///
/// let quick = Retry::fixed(2, Duration::from_millis(250));
/// assert_eq!(quick.delay_before(1), Duration::from_millis(250));
///
/// let patient = Retry::exponential(4, Duration::from_millis(500), Duration::from_secs(4))
///     .with_jitter(0.0);
/// assert_eq!(patient.delay_before(3), Duration::from_secs(2));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Retry {
    /// Re-sends after the first attempt; 0 sends once.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

/// Delay strategy between attempts.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Backoff {
    /// Re-send immediately.
    #[default]
    None,
    Fixed { delay: Duration },
    /// `initial * 2^(n-1)` before the n-th retry, capped at `max`, scaled by a
    /// factor in `[1 - jitter, 1 + jitter]`.
    Exponential {
        initial: Duration,
        max: Duration,
        jitter: f64,
    },
}

impl Default for Retry {
    /// Three immediate retries.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::None,
        }
    }
}

impl Retry {
    /// Send once, never retry.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: Backoff::None,
        }
    }

    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: attempts,
            backoff: Backoff::Fixed { delay },
        }
    }

    /// Exponential backoff with 25% jitter.
    pub fn exponential(attempts: u32, initial: Duration, max: Duration) -> Self {
        Self {
            max_attempts: attempts,
            backoff: Backoff::Exponential {
                initial,
                max,
                jitter: 0.25,
            },
        }
    }

    /// Replace the jitter of an exponential policy; clamped to `[0, 1]`.
    pub fn with_jitter(mut self, value: f64) -> Self {
        if let Backoff::Exponential { jitter, .. } = &mut self.backoff {
            *jitter = value.clamp(0.0, 1.0);
        }
        self
    }

    /// Delay before the `retry`-th re-send (1-based).
    pub fn delay_before(&self, retry: u32) -> Duration {
        match &self.backoff {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed { delay } => *delay,
            Backoff::Exponential {
                initial,
                max,
                jitter,
            } => {
                let shift = retry.saturating_sub(1).min(31);
                let base = initial.saturating_mul(1u32 << shift).min(*max);
                base.mul_f64(jitter_factor(*jitter))
            }
        }
    }
}

static JITTER_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Pseudo-random factor in `[1 - jitter, 1 + jitter]`.
///
/// A multiplicative hash of a counter is plenty to keep clients from retrying in lockstep.
fn jitter_factor(jitter: f64) -> f64 {
    if jitter <= 0.0 {
        return 1.0;
    }
    let counter = JITTER_COUNTER.fetch_add(1, Ordering::Relaxed);
    let hash = counter.wrapping_mul(0x5851_f42d_4c95_7f2d);
    let unit = (hash >> 11) as f64 / (1u64 << 53) as f64;
    1.0 + (unit - 0.5) * 2.0 * jitter
}
