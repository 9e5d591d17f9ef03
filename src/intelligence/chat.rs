// ABOUTME: LLM-backed classification of coach-chat messages for routing
// ABOUTME: Sorts messages into topics and flags those that warrant injury screening
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

//! # Chat Classification
//!
//! Sorts an incoming coach-chat message into a [`MessageTopic`] so the
//! backend can route it, and flags messages that mention pain or discomfort
//! for a follow-up pass through the injury screener.
//!
//! Same boundary-adapter shape as injury screening: [`classify_message`]
//! never returns an error, degrading to [`ChatClassification::fallback`] on
//! any failure. The fallback routes to the general handler and flags the
//! message for injury screening, so a broken classifier can only over-screen,
//! never under-screen.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::{debug, warn};

use super::extract_json;
use crate::errors::AppError;
use crate::llm::{get_chat_classification_prompt, ChatMessage, ChatRequest, LlmProvider};

/// Temperature for classification requests; low for consistent routing
const CLASSIFICATION_TEMPERATURE: f32 = 0.1;

/// Token bound for classification replies; the schema is tiny
const CLASSIFICATION_MAX_TOKENS: u32 = 256;

// ============================================================================
// Classification Types
// ============================================================================

/// Routing topic for a coach-chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTopic {
    /// Programming, exercises, technique
    Training,
    /// Diet, macros, supplementation
    Nutrition,
    /// Sleep, rest days, soreness management
    Recovery,
    /// Pain or a possible injury, including training around one
    InjuryConcern,
    /// Motivation, adherence, mindset
    Motivation,
    /// Everything else
    General,
}

impl MessageTopic {
    /// API string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Nutrition => "nutrition",
            Self::Recovery => "recovery",
            Self::InjuryConcern => "injury_concern",
            Self::Motivation => "motivation",
            Self::General => "general",
        }
    }
}

impl Display for MessageTopic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Routing decision for a coach-chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatClassification {
    /// Topic the message belongs to
    pub topic: MessageTopic,
    /// Model confidence in the topic, always within [0, 1]
    pub confidence: f64,
    /// Whether the message should also pass through injury screening
    pub needs_injury_screening: bool,
}

impl ChatClassification {
    /// The fixed fallback substituted on any failure path
    ///
    /// Routes to the general handler and flags the message for injury
    /// screening, the cautious direction for a health-adjacent router.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            topic: MessageTopic::General,
            confidence: 0.5,
            needs_injury_screening: true,
        }
    }
}

// ============================================================================
// Classification Service
// ============================================================================

/// Classify a coach-chat message for routing
///
/// Infallible by contract: remote-call failures and response-shape failures
/// both degrade to [`ChatClassification::fallback`], distinguished only in
/// logging.
pub async fn classify_message(provider: &dyn LlmProvider, message: &str) -> ChatClassification {
    debug!(length = message.len(), "Classifying chat message");

    let messages = vec![
        ChatMessage::system(get_chat_classification_prompt()),
        ChatMessage::user(format!("Classify this message:\n\n{message}")),
    ];

    let request = ChatRequest::new(messages)
        .with_temperature(CLASSIFICATION_TEMPERATURE)
        .with_max_tokens(CLASSIFICATION_MAX_TOKENS);

    let response = match provider.complete(&request).await {
        Ok(response) => response,
        Err(error) => {
            warn!(error = %error, "Chat classification LLM call failed, returning fallback");
            return ChatClassification::fallback();
        }
    };

    match parse_classification(&response.content) {
        Ok(classification) => classification,
        Err(error) => {
            warn!(error = %error, "Chat classification reply failed validation, returning fallback");
            ChatClassification::fallback()
        }
    }
}

/// Parse and validate an LLM reply into a routing decision
fn parse_classification(reply: &str) -> Result<ChatClassification, AppError> {
    let json = extract_json(reply)?;

    let classification: ChatClassification = serde_json::from_str(&json).map_err(|e| {
        AppError::serialization(format!("Chat classification did not match schema: {e}"))
    })?;

    if !(0.0..=1.0).contains(&classification.confidence) {
        return Err(AppError::value_out_of_range(format!(
            "Classification confidence {} outside [0, 1]",
            classification.confidence
        )));
    }

    Ok(classification)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_over_screens() {
        let fallback = ChatClassification::fallback();
        assert_eq!(fallback.topic, MessageTopic::General);
        assert!(fallback.needs_injury_screening);
    }

    #[test]
    fn test_parse_classification_valid() {
        let reply = r#"{"topic": "injury_concern", "confidence": 0.85, "needs_injury_screening": true}"#;
        let classification = parse_classification(reply).unwrap();
        assert_eq!(classification.topic, MessageTopic::InjuryConcern);
        assert!(classification.needs_injury_screening);
    }

    #[test]
    fn test_parse_classification_rejects_unknown_topic() {
        let reply = r#"{"topic": "astrology", "confidence": 0.9, "needs_injury_screening": false}"#;
        assert!(parse_classification(reply).is_err());
    }

    #[test]
    fn test_parse_classification_rejects_out_of_range_confidence() {
        let reply = r#"{"topic": "training", "confidence": -0.1, "needs_injury_screening": false}"#;
        assert!(parse_classification(reply).is_err());
    }

    #[test]
    fn test_topic_round_trip() {
        for topic in [
            MessageTopic::Training,
            MessageTopic::Nutrition,
            MessageTopic::Recovery,
            MessageTopic::InjuryConcern,
            MessageTopic::Motivation,
            MessageTopic::General,
        ] {
            let json = serde_json::to_string(&topic).unwrap();
            assert_eq!(json, format!("\"{topic}\""));
        }
    }
}
