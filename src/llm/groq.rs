// ABOUTME: Groq chat-completion backend, the production LlmProvider implementation
// ABOUTME: Speaks the OpenAI-compatible API and maps Groq failures onto AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

//! # Groq Backend
//!
//! Serves the classifiers through Groq's LPU-hosted open models. Two
//! environment variables matter:
//!
//! - `GROQ_API_KEY` (required) — key from <https://console.groq.com/keys>
//! - `FORMA_LLM_MODEL` (optional) — overrides the default Llama model for
//!   every request that does not name one

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::errors::{AppError, ErrorCode};

const API_KEY_ENV: &str = "GROQ_API_KEY";
const MODEL_ENV: &str = "FORMA_LLM_MODEL";

const API_BASE: &str = "https://api.groq.com/openai/v1";

const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const AVAILABLE_MODELS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "mixtral-8x7b-32768",
    "gemma2-9b-it",
];

/// How much of an unparseable error body to quote back in messages
const ERROR_BODY_SNIPPET: usize = 200;

/// Production chat-completion backend on Groq
pub struct GroqProvider {
    client: Client,
    api_key: String,
    default_model: String,
}

impl GroqProvider {
    /// Provider with an explicit key and the stock default model
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            default_model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Provider configured from the environment
    ///
    /// Reads the API key from `GROQ_API_KEY` and, when `FORMA_LLM_MODEL` is
    /// set and non-empty, uses it as the default model.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `GROQ_API_KEY` is unset.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var(API_KEY_ENV).map_err(|_| {
            AppError::config(format!(
                "{API_KEY_ENV} is not set; create a key at https://console.groq.com/keys"
            ))
        })?;

        let provider = Self::new(api_key);
        match env::var(MODEL_ENV).ok().filter(|m| !m.is_empty()) {
            Some(model) => Ok(provider.with_default_model(model)),
            None => Ok(provider),
        }
    }

    /// Replace the default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn endpoint(path: &str) -> String {
        format!("{API_BASE}/{path}")
    }

    /// Translate a non-2xx reply into the matching error class
    fn error_for_status(status: StatusCode, body: &str) -> AppError {
        let Ok(parsed) = serde_json::from_str::<WireError>(body) else {
            let snippet: String = body.chars().take(ERROR_BODY_SNIPPET).collect();
            return AppError::external_service("Groq", format!("{status}: {snippet}"));
        };

        let detail = parsed.error.message;
        match status {
            StatusCode::UNAUTHORIZED => {
                AppError::auth_invalid(format!("Groq rejected the API key: {detail}"))
            }
            StatusCode::TOO_MANY_REQUESTS => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("Groq rate limit hit: {detail}"),
            ),
            StatusCode::BAD_REQUEST => {
                AppError::invalid_input(format!("Groq refused the request: {detail}"))
            }
            _ => AppError::external_service("Groq", detail),
        }
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn display_name(&self) -> &'static str {
        "Groq"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES
            | LlmCapabilities::JSON_MODE
            | LlmCapabilities::FUNCTION_CALLING
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let payload = WireRequest::from_chat(request, &self.default_model);

        debug!(messages = payload.messages.len(), "Calling Groq chat completions");

        let response = self
            .client
            .post(Self::endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Groq request did not go out");
                AppError::external_unavailable("Groq", format!("connect failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Groq reply body could not be read");
            AppError::external_service("Groq", format!("read failed: {e}"))
        })?;

        if !status.is_success() {
            warn!(status = %status, "Groq returned an error status");
            return Err(Self::error_for_status(status, &body));
        }

        let completion: WireResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Groq reply was not a completion");
            AppError::external_service("Groq", format!("unexpected reply shape: {e}"))
        })?;

        completion.into_chat_response()
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        // Listing models is the cheapest authenticated call
        let response = self
            .client
            .get(Self::endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                AppError::external_unavailable("Groq", format!("health check failed: {e}"))
            })?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!(status = %response.status(), "Groq health check not OK");
        }
        Ok(healthy)
    }
}

// Wire types for the OpenAI-compatible chat completions endpoint.

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl WireRequest {
    fn from_chat(request: &ChatRequest, default_model: &str) -> Self {
        Self {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_owned()),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

impl WireResponse {
    fn into_chat_response(self) -> Result<ChatResponse, AppError> {
        let usage = self.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("Groq", "completion had no choices"))?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            model: self.model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    message: String,
}
