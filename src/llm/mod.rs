// ABOUTME: Chat-completion abstraction the coaching classifiers are written against
// ABOUTME: Defines the LlmProvider trait, message/request/response types, and capability flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

//! # LLM Provider Layer
//!
//! The classifiers in [`crate::intelligence`] never talk to a model API
//! directly; they are written against the [`LlmProvider`] trait and receive
//! an implementation from the caller. Production uses [`GroqProvider`],
//! configured from the environment; tests inject a scripted stand-in.
//!
//! A request is a list of role-tagged messages plus optional generation
//! knobs. Both classifiers run near-deterministic (low temperature, bounded
//! tokens), so [`ChatRequest`] exposes exactly those knobs and nothing more.
//!
//! ```rust,no_run
//! use forma_ai::llm::{ChatMessage, ChatRequest, GroqProvider, LlmProvider};
//!
//! async fn run() -> Result<(), forma_ai::errors::AppError> {
//!     let provider = GroqProvider::from_env()?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("What is a deload week?")])
//!         .with_temperature(0.2);
//!     let reply = provider.complete(&request).await?;
//!     println!("{}", reply.content);
//!     Ok(())
//! }
//! ```

mod groq;
pub mod prompts;

pub use groq::GroqProvider;
pub use prompts::{get_chat_classification_prompt, get_injury_screening_prompt};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

bitflags::bitflags! {
    /// Feature set advertised by a provider implementation
    ///
    /// Callers that need a guarantee (a system slot for the screening
    /// instructions, native JSON output) can check before sending.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Accepts a dedicated system message
        const SYSTEM_MESSAGES = 1;
        /// Can be forced into JSON-only output
        const JSON_MODE = 1 << 1;
        /// Supports tool/function calling
        const FUNCTION_CALLING = 1 << 2;
    }
}

impl LlmCapabilities {
    /// The minimum this crate relies on: plain text plus a system slot
    #[must_use]
    pub const fn text_only() -> Self {
        Self::SYSTEM_MESSAGES
    }

    /// Whether a dedicated system message is accepted
    #[must_use]
    pub const fn supports_system_messages(&self) -> bool {
        self.contains(Self::SYSTEM_MESSAGES)
    }

    /// Whether JSON-only output can be requested
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.contains(Self::JSON_MODE)
    }

    /// Whether tool/function calling is available
    #[must_use]
    pub const fn supports_function_calling(&self) -> bool {
        self.contains(Self::FUNCTION_CALLING)
    }
}

/// Who a conversation message is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Standing instructions for the model
    System,
    /// End-user input
    User,
    /// A prior model reply
    Assistant,
}

impl MessageRole {
    /// Wire-format name of the role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Attribution of this message
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Build a message with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Standing instructions for the model
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// End-user input
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// A prior model reply
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// A chat completion request
///
/// `model`, `temperature`, and `max_tokens` are optional; the provider
/// substitutes its defaults for whatever is unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, in order
    pub messages: Vec<ChatMessage>,
    /// Model override; provider default when `None`
    pub model: Option<String>,
    /// Sampling temperature; lower is more deterministic
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Request with the given messages and all knobs unset
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Pick a specific model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Bound the number of generated tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A completed chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Token accounting, when the API reports it
    pub usage: Option<TokenUsage>,
    /// Why generation stopped ("stop", "length", ...)
    pub finish_reason: Option<String>,
}

/// Token accounting for one completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the reply
    pub completion_tokens: u32,
    /// Prompt plus completion
    pub total_tokens: u32,
}

/// Contract between the classifiers and a chat-completion backend
///
/// Implementations must be cheap to share across tasks; the classifiers
/// borrow the provider per call and hold no state between calls.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short identifier ("groq", "test")
    fn name(&self) -> &'static str;

    /// Human-readable name for logs and diagnostics
    fn display_name(&self) -> &'static str;

    /// Advertised feature set
    fn capabilities(&self) -> LlmCapabilities;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;

    /// Models this provider can serve
    fn available_models(&self) -> &'static [&'static str];

    /// Run one chat completion
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be reached, rejects the
    /// request, or replies with something that is not a completion.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;

    /// Cheap reachability and credential check
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be reached at all.
    async fn health_check(&self) -> Result<bool, AppError>;
}
