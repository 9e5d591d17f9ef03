// ABOUTME: Integration tests for the coach-chat message classifier
// ABOUTME: Covers topic routing, fallback behavior, and prompt composition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::float_cmp)]

mod common;

use common::TestLlmProvider;
use forma_ai::intelligence::chat::{classify_message, ChatClassification, MessageTopic};
use forma_ai::llm::MessageRole;

#[tokio::test]
async fn valid_classification_is_returned_verbatim() {
    let provider = TestLlmProvider::replying(
        r#"{"topic": "nutrition", "confidence": 0.92, "needs_injury_screening": false}"#,
    );

    let classification =
        classify_message(&provider, "How much protein should I eat on rest days?").await;

    assert_eq!(classification.topic, MessageTopic::Nutrition);
    assert_eq!(classification.confidence, 0.92);
    assert!(!classification.needs_injury_screening);
}

#[tokio::test]
async fn injury_mention_flags_screening() {
    let provider = TestLlmProvider::replying(
        r#"{"topic": "injury_concern", "confidence": 0.8, "needs_injury_screening": true}"#,
    );

    let classification =
        classify_message(&provider, "Can I keep squatting with this knee pain?").await;

    assert_eq!(classification.topic, MessageTopic::InjuryConcern);
    assert!(classification.needs_injury_screening);
}

#[tokio::test]
async fn remote_failure_returns_fallback() {
    let provider = TestLlmProvider::unreachable();

    let classification = classify_message(&provider, "What's a good warm-up?").await;

    assert_eq!(classification, ChatClassification::fallback());
    assert_eq!(classification.topic, MessageTopic::General);
    // The fallback over-screens rather than under-screens
    assert!(classification.needs_injury_screening);
}

#[tokio::test]
async fn prose_reply_returns_fallback() {
    let provider = TestLlmProvider::replying("That sounds like a training question to me.");

    let classification = classify_message(&provider, "Should I add a deload week?").await;

    assert_eq!(classification, ChatClassification::fallback());
}

#[tokio::test]
async fn unknown_topic_returns_fallback() {
    let provider = TestLlmProvider::replying(
        r#"{"topic": "meditation", "confidence": 0.9, "needs_injury_screening": false}"#,
    );

    let classification = classify_message(&provider, "Any breathing tips?").await;

    assert_eq!(classification, ChatClassification::fallback());
}

#[tokio::test]
async fn out_of_range_confidence_returns_fallback() {
    let provider = TestLlmProvider::replying(
        r#"{"topic": "training", "confidence": 2.0, "needs_injury_screening": false}"#,
    );

    let classification = classify_message(&provider, "More volume or more intensity?").await;

    assert_eq!(classification, ChatClassification::fallback());
}

#[tokio::test]
async fn prompt_carries_the_message() {
    let provider = TestLlmProvider::replying(
        r#"{"topic": "motivation", "confidence": 0.7, "needs_injury_screening": false}"#,
    );

    classify_message(&provider, "I keep skipping my morning sessions").await;

    let request = provider.last_request().unwrap();
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, MessageRole::System);
    assert!(request.messages[1]
        .content
        .contains("I keep skipping my morning sessions"));
    let temperature = request.temperature.unwrap();
    assert!(temperature <= 0.5);
}
