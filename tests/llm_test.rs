// ABOUTME: Unit tests for the LLM provider abstraction layer
// ABOUTME: Tests capabilities, message handling, request builders, and the Groq backend surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::float_cmp)]

mod common;

use common::{ScriptedReply, TestLlmProvider};
use forma_ai::llm::{
    ChatMessage, ChatRequest, GroqProvider, LlmCapabilities, LlmProvider, MessageRole,
};

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn capabilities_text_only_baseline() {
    let caps = LlmCapabilities::text_only();
    assert!(caps.supports_system_messages());
    assert!(!caps.supports_json_mode());
    assert!(!caps.supports_function_calling());
}

#[test]
fn capabilities_compose_with_bit_ops() {
    let caps = LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE;
    assert!(caps.supports_json_mode());
    assert!(!caps.supports_function_calling());
}

// ============================================================================
// Messages and Requests
// ============================================================================

#[test]
fn message_role_strings() {
    assert_eq!(MessageRole::System.as_str(), "system");
    assert_eq!(MessageRole::User.as_str(), "user");
    assert_eq!(MessageRole::Assistant.as_str(), "assistant");
}

#[test]
fn message_constructors_set_roles() {
    assert_eq!(ChatMessage::system("s").role, MessageRole::System);
    assert_eq!(ChatMessage::user("u").role, MessageRole::User);
    assert_eq!(ChatMessage::assistant("a").role, MessageRole::Assistant);
}

#[test]
fn request_builder_chains() {
    let request = ChatRequest::new(vec![ChatMessage::user("hi")])
        .with_model("test-model")
        .with_temperature(0.2)
        .with_max_tokens(512);

    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.model.as_deref(), Some("test-model"));
    assert_eq!(request.temperature, Some(0.2));
    assert_eq!(request.max_tokens, Some(512));
}

#[test]
fn request_defaults_are_unset() {
    let request = ChatRequest::new(vec![]);
    assert!(request.model.is_none());
    assert!(request.temperature.is_none());
    assert!(request.max_tokens.is_none());
}

// ============================================================================
// Groq Backend
// ============================================================================

#[test]
fn groq_provider_metadata() {
    let provider = GroqProvider::new("test-key".to_owned());
    assert_eq!(provider.name(), "groq");
    assert!(provider.capabilities().supports_system_messages());
    assert!(provider.capabilities().supports_json_mode());
    assert!(provider
        .available_models()
        .iter()
        .any(|m| *m == provider.default_model()));
}

#[test]
fn groq_default_model_override() {
    let provider =
        GroqProvider::new("test-key".to_owned()).with_default_model("llama-3.1-8b-instant");
    assert_eq!(provider.default_model(), "llama-3.1-8b-instant");
}

// ============================================================================
// Scripted Test Provider
// ============================================================================

#[tokio::test]
async fn scripted_provider_replays_in_order() {
    let provider = TestLlmProvider::new(vec![
        ScriptedReply::Content("first".to_owned()),
        ScriptedReply::Content("second".to_owned()),
    ]);
    let request = ChatRequest::new(vec![ChatMessage::user("hi")]);

    assert_eq!(provider.complete(&request).await.unwrap().content, "first");
    assert_eq!(provider.complete(&request).await.unwrap().content, "second");
    // Script exhausted
    assert!(provider.complete(&request).await.is_err());
}
