// src/services/scripted.rs

//! Scripted [`GenerativeApi`] for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::services::generative::{ApiError, CompletionRequest, GenerativeApi};

#[derive(Default)]
struct Script {
    queued: VecDeque<Result<String, ApiError>>,
    reply: String,
    failing: Vec<(String, ApiError)>,
    log: Vec<(Instant, CompletionRequest)>,
}

/// Replies from a queue, then with a fixed text. Clones share state.
#[derive(Clone, Default)]
pub struct ScriptedApi {
    script: Arc<Mutex<Script>>,
}

impl ScriptedApi {
    pub fn replying(reply: &str) -> Self {
        let api = Self::default();
        api.lock().reply = reply.to_string();
        api
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    /// Queue a response for the next unmatched call.
    pub fn push(&self, response: Result<String, ApiError>) {
        self.lock().queued.push_back(response);
    }

    /// Fail every request whose prompt contains `needle`.
    pub fn fail_when_prompt_contains(&self, needle: &str, error: ApiError) {
        self.lock().failing.push((needle.to_string(), error));
    }

    pub fn calls(&self) -> usize {
        self.lock().log.len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.lock().log.iter().map(|(at, _)| *at).collect()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().log.iter().map(|(_, r)| r.clone()).collect()
    }
}

#[async_trait]
impl GenerativeApi for ScriptedApi {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ApiError> {
        let mut script = self.lock();
        script.log.push((Instant::now(), request.clone()));
        if let Some((_, error)) = script
            .failing
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
        {
            return Err(error.clone());
        }
        match script.queued.pop_front() {
            Some(response) => response,
            None => Ok(script.reply.clone()),
        }
    }
}
