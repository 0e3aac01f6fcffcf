//! Retry combinator shared by the call level and the segment level.
//!
//! Two independently configured [`RetryPolicy`] values drive the pipeline:
//! the STT client retries individual HTTP calls (exponential backoff, warm-up
//! hints), the orchestrator retries whole segments (linear backoff). Both go
//! through [`retry`] so attempt limits and backoff strategy stay swappable.

use std::future::Future;
use std::time::Duration;

/// Delay schedule between attempts. `attempt` is 0-based (first failure => 0).
#[derive(Debug, Clone, Copy)]
pub enum Backoff {
    /// Same delay after every failed attempt.
    Fixed(Duration),
    /// `step * (attempt + 1)`: 2s, 4s, 6s...
    Linear { step: Duration },
    /// `base * 2^attempt`, capped: 1s, 2s, 4s... up to `cap`.
    Exponential { base: Duration, cap: Duration },
}

impl Backoff {
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(d) => *d,
            Backoff::Linear { step } => step.saturating_mul(attempt + 1),
            Backoff::Exponential { base, cap } => {
                let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
                (*base).saturating_mul(factor).min(*cap)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Call-level default: 3 attempts, exponential 1s..10s.
    pub fn call_level(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential {
                base: Duration::from_secs(1),
                cap: Duration::from_secs(10),
            },
        }
    }

    /// Segment-level default: 3 attempts, 2s * attempt.
    pub fn segment_level() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Linear {
                step: Duration::from_secs(2),
            },
        }
    }
}

/// Run `op` until it succeeds, the error is not retryable, or attempts run out.
///
/// `delay_hint` lets an error override the policy backoff (provider warm-up
/// asks for a specific wait); return `None` to use the policy delay.
pub async fn retry<T, E, Op, Fut>(
    policy: &RetryPolicy,
    is_retryable: impl Fn(&E) -> bool,
    delay_hint: impl Fn(&E) -> Option<Duration>,
    mut op: Op,
) -> Result<T, E>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt + 1 >= policy.max_attempts || !is_retryable(&err) {
                    return Err(err);
                }
                let delay = delay_hint(&err).unwrap_or_else(|| policy.backoff.delay(attempt));
                tracing::debug!(
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
