// ABOUTME: Shared test fixtures for integration tests
// ABOUTME: Provides a scripted in-memory LlmProvider implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
// Not every integration test uses every fixture
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use forma_ai::errors::AppError;
use forma_ai::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};

/// Scripted outcome for a single `complete` call
pub enum ScriptedReply {
    /// Provider returns this content
    Content(String),
    /// Remote call fails (unreachable service)
    Unavailable,
    /// Remote call fails (credentials rejected)
    AuthFailed,
}

/// In-memory provider that replays scripted replies and records requests
///
/// Each `complete` call pops the next scripted outcome; once the script is
/// exhausted further calls fail as unavailable. The last request is recorded
/// so tests can assert on prompt composition.
pub struct TestLlmProvider {
    script: Mutex<VecDeque<ScriptedReply>>,
    last_request: Mutex<Option<ChatRequest>>,
}

impl TestLlmProvider {
    pub fn new(script: Vec<ScriptedReply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last_request: Mutex::new(None),
        }
    }

    /// Provider that always replies with the given content
    pub fn replying(content: impl Into<String>) -> Self {
        Self::new(vec![ScriptedReply::Content(content.into())])
    }

    /// Provider whose remote call always fails
    pub fn unreachable() -> Self {
        Self::new(vec![ScriptedReply::Unavailable])
    }

    /// The most recent request passed to `complete`
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for TestLlmProvider {
    fn name(&self) -> &'static str {
        "test"
    }

    fn display_name(&self) -> &'static str {
        "Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::text_only()
    }

    fn default_model(&self) -> &str {
        "test-model"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &["test-model"]
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        *self.last_request.lock().unwrap() = Some(request.clone());

        let outcome = self.script.lock().unwrap().pop_front();
        match outcome {
            Some(ScriptedReply::Content(content)) => Ok(ChatResponse {
                content,
                model: "test-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Some(ScriptedReply::Unavailable) | None => Err(AppError::external_unavailable(
                "test",
                "scripted connection failure",
            )),
            Some(ScriptedReply::AuthFailed) => {
                Err(AppError::auth_invalid("scripted invalid API key"))
            }
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}
