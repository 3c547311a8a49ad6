// src/services/readiness.rs

//! Polling primitives for UI conditions.
//!
//! A condition that does not become true within its timeout is reported as
//! [`Readiness::Absent`], never as an error. Only failures of the probe itself
//! (a dead browser session, a filesystem error) propagate.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::error::Result;

/// Timing of one readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Upper bound on the whole wait
    pub timeout: Duration,
    /// Delay between probes
    pub poll_interval: Duration,
    /// How long a value must stay unchanged (`await_stable` only)
    pub stable_for: Duration,
    /// Extra delay after the condition is met
    pub settle: Duration,
}

impl ReadinessPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
            stable_for: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }

    pub fn stable_for(mut self, stable_for: Duration) -> Self {
        self.stable_for = stable_for;
        self
    }

    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}

/// Outcome of a readiness wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness<T> {
    Ready(T),
    Absent,
}

impl<T> Readiness<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Readiness::Ready(value) => Some(value),
            Readiness::Absent => None,
        }
    }
}

/// Poll `probe` until it yields a value or the timeout elapses.
pub async fn await_ready<T, F, Fut>(mut probe: F, policy: &ReadinessPolicy) -> Result<Readiness<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + policy.timeout;
    loop {
        if let Some(value) = probe().await? {
            if !policy.settle.is_zero() {
                sleep(policy.settle).await;
            }
            return Ok(Readiness::Ready(value));
        }
        if Instant::now() >= deadline {
            return Ok(Readiness::Absent);
        }
        sleep(policy.poll_interval).await;
    }
}

/// Poll `probe` until its value stops changing for `policy.stable_for`.
///
/// Used for counts that grow while content loads (accordion sections,
/// network resource entries).
pub async fn await_stable<T, F, Fut>(mut probe: F, policy: &ReadinessPolicy) -> Result<Readiness<T>>
where
    T: PartialEq,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let deadline = Instant::now() + policy.timeout;
    let mut last = probe().await?;
    let mut since = Instant::now();
    loop {
        if since.elapsed() >= policy.stable_for {
            if !policy.settle.is_zero() {
                sleep(policy.settle).await;
            }
            return Ok(Readiness::Ready(last));
        }
        if Instant::now() >= deadline {
            return Ok(Readiness::Absent);
        }
        sleep(policy.poll_interval).await;
        let current = probe().await?;
        if current != last {
            last = current;
            since = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn policy() -> ReadinessPolicy {
        ReadinessPolicy::new(Duration::from_secs(5), Duration::from_millis(100))
    }

    #[tokio::test(start_paused = true)]
    async fn ready_after_a_few_polls() {
        let calls = Cell::new(0);
        let result = await_ready(
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Ok((n >= 3).then_some(n)) }
            },
            &policy(),
        )
        .await
        .unwrap();
        assert_eq!(result, Readiness::Ready(3));
    }

    #[tokio::test(start_paused = true)]
    async fn absent_after_timeout() {
        let start = Instant::now();
        let result: Readiness<()> = await_ready(|| async { Ok(None) }, &policy())
            .await
            .unwrap();
        assert_eq!(result, Readiness::Absent);
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn settle_delay_is_applied() {
        let start = Instant::now();
        let settled = policy().settle(Duration::from_millis(600));
        let result = await_ready(|| async { Ok(Some(1)) }, &settled).await.unwrap();
        assert!(result.is_ready());
        assert!(start.elapsed() >= Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn probe_errors_propagate() {
        let result: Result<Readiness<()>> = await_ready(
            || async { Err(crate::error::AppError::validation("session gone")) },
            &policy(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stable_waits_for_growth_to_stop() {
        let calls = Cell::new(0usize);
        let stable = policy().stable_for(Duration::from_millis(500));
        let result = await_stable(
            || {
                calls.set(calls.get() + 1);
                let n = calls.get().min(4);
                async move { Ok(n) }
            },
            &stable,
        )
        .await
        .unwrap();
        assert_eq!(result, Readiness::Ready(4));
        assert!(calls.get() >= 9);
    }

    #[tokio::test(start_paused = true)]
    async fn stable_is_absent_when_value_keeps_changing() {
        let calls = Cell::new(0usize);
        let stable = policy().stable_for(Duration::from_millis(500));
        let result = await_stable(
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Ok(n) }
            },
            &stable,
        )
        .await
        .unwrap();
        assert_eq!(result, Readiness::Absent);
    }
}
