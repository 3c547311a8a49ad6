//! Service layer for the pipeline.
//!
//! This module contains the business logic for:
//! - Exclusive team selection (`TeamSelector`)
//! - Athlete enumeration (`AthleteEnumerator`)
//! - Screenshot capture with deduplication (`CaptureEngine`)
//! - Paced, retrying generative-API calls (`RateLimitedClient`)
//! - Prompts and program documents for the report stages

pub mod athletes;
pub mod capture;
pub mod document;
pub mod generative;
pub mod prompts;
pub mod rate_limit;
pub mod readiness;
#[cfg(test)]
pub mod scripted;
pub mod teams;

pub use athletes::{AthleteEnumerator, AthleteFilter};
pub use capture::{CaptureEngine, CaptureReport, DedupLedger};
pub use document::ProgramPlan;
pub use generative::{ApiError, CompletionRequest, GenerativeApi, ImageInput, OpenAiCompatible};
pub use rate_limit::{CallOutcome, CooldownPolicy, PacingPolicy, RateLimitedClient, RetryPolicy};
pub use readiness::{Readiness, ReadinessPolicy, await_ready, await_stable};
pub use teams::{ActiveTeam, TeamSelector};
