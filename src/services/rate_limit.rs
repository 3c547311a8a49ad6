// src/services/rate_limit.rs

//! Paced, retrying wrapper around generative-API calls.
//!
//! Three policies compose around every call:
//!
//! - [`PacingPolicy`]: minimum spacing between any two request attempts
//! - [`CooldownPolicy`]: a mandatory pause after every batch of items
//! - [`RetryPolicy`]: exponential backoff with jitter for transient failures
//!
//! Exhausted or terminal failures come back as [`CallOutcome::Failed`] so the
//! caller can record the athlete and move on.

use std::time::Duration;

use rand::Rng;
use tokio::time::{Instant, sleep, sleep_until};

use crate::models::ApiSettings;
use crate::services::generative::{ApiError, CompletionRequest, GenerativeApi};

/// Minimum spacing between request attempts, derived from requests per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    rpm: u32,
}

impl PacingPolicy {
    pub fn per_minute(rpm: u32) -> Self {
        Self { rpm }
    }

    pub fn rpm(&self) -> u32 {
        self.rpm
    }

    /// `60 / rpm` seconds.
    pub fn min_interval(&self) -> Duration {
        if self.rpm == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(60) / self.rpm
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.rpm == 0 {
            return Err("rpm must be > 0".into());
        }
        Ok(())
    }
}

/// Pause applied after every `batch_size` processed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    /// Items per batch; 0 disables the cooldown
    pub batch_size: usize,
    pub cooldown: Duration,
}

impl CooldownPolicy {
    pub fn new(batch_size: usize, cooldown: Duration) -> Self {
        Self {
            batch_size,
            cooldown,
        }
    }

    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Whether a cooldown is due before the next call.
    pub fn due(&self, processed: usize) -> bool {
        self.batch_size > 0
            && !self.cooldown.is_zero()
            && processed > 0
            && processed % self.batch_size == 0
    }
}

/// Exponential backoff for transient failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    /// Upper bound of the uniform random delay added to each backoff
    pub jitter: Duration,
}

impl RetryPolicy {
    /// Backoff after the given (1-based) failed attempt, without jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = scaled.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// Wait before the next attempt: jittered backoff, or the server's
    /// `Retry-After` when that is longer.
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms > 0 {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        } else {
            Duration::ZERO
        };
        let computed = self.delay_for(attempt) + jitter;
        match retry_after {
            Some(wait) if wait > computed => wait,
            _ => computed,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be > 0".into());
        }
        if self.multiplier.is_nan() || self.multiplier < 1.0 {
            return Err("backoff multiplier must be >= 1".into());
        }
        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(3),
            multiplier: 2.0,
            max_delay: Duration::from_secs(120),
            jitter: Duration::from_secs(1),
        }
    }
}

/// Result of one paced call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Completed(String),
    Failed { attempts: u32, reason: String },
}

/// Sequential, rate-limited access to a [`GenerativeApi`].
///
/// Calls take `&mut self`, so at most one request is ever in flight.
pub struct RateLimitedClient<A> {
    api: A,
    pacing: PacingPolicy,
    retry: RetryPolicy,
    cooldown: CooldownPolicy,
    last_attempt: Option<Instant>,
    processed: usize,
    cooled_at: usize,
    attempts_sent: u64,
}

impl<A: GenerativeApi> RateLimitedClient<A> {
    pub fn new(api: A, pacing: PacingPolicy, retry: RetryPolicy, cooldown: CooldownPolicy) -> Self {
        Self {
            api,
            pacing,
            retry,
            cooldown,
            last_attempt: None,
            processed: 0,
            cooled_at: 0,
            attempts_sent: 0,
        }
    }

    pub fn from_settings(api: A, settings: &ApiSettings) -> Self {
        Self::new(api, settings.pacing, settings.retry, settings.cooldown)
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Items processed so far (completed or failed).
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Request attempts sent so far, retries included.
    pub fn attempts_sent(&self) -> u64 {
        self.attempts_sent
    }

    /// Run one item's request through cooldown, pacing and retry.
    pub async fn call(&mut self, request: &CompletionRequest) -> CallOutcome {
        self.apply_cooldown().await;

        let mut attempt = 0;
        let outcome = loop {
            attempt += 1;
            self.pace().await;
            self.attempts_sent += 1;

            let error = match self.api.complete(request).await {
                Ok(text) if !text.trim().is_empty() => break CallOutcome::Completed(text),
                Ok(_) => ApiError::EmptyResponse,
                Err(error) => error,
            };

            if !error.is_transient() {
                log::warn!("Request failed permanently: {}", error);
                break CallOutcome::Failed {
                    attempts: attempt,
                    reason: error.to_string(),
                };
            }
            if attempt >= self.retry.max_attempts {
                log::warn!("Giving up after {} attempts: {}", attempt, error);
                break CallOutcome::Failed {
                    attempts: attempt,
                    reason: error.to_string(),
                };
            }

            let wait = self.retry.backoff(attempt, error.retry_after());
            log::warn!(
                "Attempt {}/{} failed ({}), retrying in {:.1}s",
                attempt,
                self.retry.max_attempts,
                error,
                wait.as_secs_f64()
            );
            sleep(wait).await;
        };

        self.processed += 1;
        outcome
    }

    async fn pace(&mut self) {
        if let Some(last) = self.last_attempt {
            let next = last + self.pacing.min_interval();
            if Instant::now() < next {
                log::debug!(
                    "Pacing: waiting {:.1}s",
                    (next - Instant::now()).as_secs_f64()
                );
                sleep_until(next).await;
            }
        }
        self.last_attempt = Some(Instant::now());
    }

    async fn apply_cooldown(&mut self) {
        if self.cooldown.due(self.processed) && self.cooled_at != self.processed {
            log::info!(
                "Batch of {} done, cooling down for {}s",
                self.cooldown.batch_size,
                self.cooldown.cooldown.as_secs()
            );
            sleep(self.cooldown.cooldown).await;
            self.cooled_at = self.processed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scripted::ScriptedApi;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "m".into(),
            system: None,
            prompt: "p".into(),
            images: vec![],
            temperature: 0.0,
        }
    }

    fn quick_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(10),
            jitter: Duration::ZERO,
        }
    }

    fn client(api: ScriptedApi, rpm: u32, retry: RetryPolicy) -> RateLimitedClient<ScriptedApi> {
        RateLimitedClient::new(
            api,
            PacingPolicy::per_minute(rpm),
            retry,
            CooldownPolicy::disabled(),
        )
    }

    #[test]
    fn test_min_interval() {
        assert_eq!(PacingPolicy::per_minute(1).min_interval(), Duration::from_secs(60));
        assert_eq!(PacingPolicy::per_minute(2).min_interval(), Duration::from_secs(30));
        assert!(PacingPolicy::per_minute(0).validate().is_err());
    }

    #[test]
    fn test_backoff_growth_and_cap() {
        let retry = quick_retry(5);
        assert_eq!(retry.delay_for(1), Duration::from_secs(1));
        assert_eq!(retry.delay_for(2), Duration::from_secs(2));
        assert_eq!(retry.delay_for(3), Duration::from_secs(4));
        assert_eq!(retry.delay_for(6), Duration::from_secs(10));
    }

    #[test]
    fn test_jitter_is_bounded() {
        let retry = RetryPolicy {
            jitter: Duration::from_millis(500),
            ..quick_retry(3)
        };
        for _ in 0..50 {
            let wait = retry.backoff(2, None);
            assert!(wait >= Duration::from_secs(2));
            assert!(wait <= Duration::from_millis(2500));
        }
    }

    #[test]
    fn test_retry_after_wins_when_longer() {
        let retry = quick_retry(3);
        assert_eq!(
            retry.backoff(1, Some(Duration::from_secs(30))),
            Duration::from_secs(30)
        );
        assert_eq!(
            retry.backoff(3, Some(Duration::from_millis(10))),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn test_cooldown_due() {
        let cooldown = CooldownPolicy::new(5, Duration::from_secs(180));
        assert!(!cooldown.due(0));
        assert!(!cooldown.due(4));
        assert!(cooldown.due(5));
        assert!(cooldown.due(10));
        assert!(!CooldownPolicy::disabled().due(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_lower_bound() {
        let api = ScriptedApi::replying("ok");
        let mut client = client(api.clone(), 2, quick_retry(1));
        for _ in 0..4 {
            assert!(matches!(client.call(&request()).await, CallOutcome::Completed(_)));
        }
        let times = api.call_times();
        assert_eq!(times.len(), 4);
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(30));
        }
        assert!(times[3] - times[0] >= Duration::from_secs(90));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let api = ScriptedApi::replying("report");
        api.push(Err(ApiError::Server {
            status: 502,
            message: "bad gateway".into(),
        }));
        api.push(Ok(String::new()));
        let mut client = client(api.clone(), 60, quick_retry(3));

        assert_eq!(
            client.call(&request()).await,
            CallOutcome::Completed("report".into())
        );
        assert_eq!(api.calls(), 3);
        assert_eq!(client.attempts_sent(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_paced_too() {
        let api = ScriptedApi::replying("ok");
        api.push(Err(ApiError::Timeout));
        let mut client = client(api.clone(), 1, quick_retry(2));
        client.call(&request()).await;
        let times = api.call_times();
        assert!(times[1] - times[0] >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_failed() {
        let api = ScriptedApi::replying("never");
        for _ in 0..3 {
            api.push(Err(ApiError::RateLimited {
                message: "quota".into(),
                retry_after: None,
            }));
        }
        let mut client = client(api.clone(), 60, quick_retry(3));
        match client.call(&request()).await {
            CallOutcome::Failed { attempts, reason } => {
                assert_eq!(attempts, 3);
                assert!(reason.contains("429"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(client.processed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_failure_is_not_retried() {
        let api = ScriptedApi::replying("never");
        api.push(Err(ApiError::Rejected {
            status: 400,
            message: "bad image".into(),
        }));
        let mut client = client(api.clone(), 60, quick_retry(5));
        assert!(matches!(
            client.call(&request()).await,
            CallOutcome::Failed { attempts: 1, .. }
        ));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_between_batches() {
        let api = ScriptedApi::replying("ok");
        let mut client = RateLimitedClient::new(
            api.clone(),
            PacingPolicy::per_minute(600),
            quick_retry(1),
            CooldownPolicy::new(2, Duration::from_secs(180)),
        );
        for _ in 0..3 {
            client.call(&request()).await;
        }
        let times = api.call_times();
        assert!(times[1] - times[0] < Duration::from_secs(10));
        assert!(times[2] - times[1] >= Duration::from_secs(180));
    }
}
