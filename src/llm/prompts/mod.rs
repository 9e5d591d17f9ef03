// ABOUTME: System prompts for LLM interactions loaded at compile time
// ABOUTME: Provides the injury screening and chat classification system instructions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

//! # System Prompts
//!
//! This module provides system prompts for LLM interactions.
//! Prompts are loaded at compile time from markdown files for easy maintenance.

/// Injury screening system prompt
///
/// Instructs the model to act as a cautious fitness triage assistant and to
/// reply with a single JSON object matching the `InjuryAssessment` schema.
pub const INJURY_SCREENING_PROMPT: &str = include_str!("injury_screening.md");

/// Chat classification system prompt
///
/// Instructs the model to sort an incoming coach-chat message into one topic
/// and flag messages that warrant injury screening.
pub const CHAT_CLASSIFICATION_PROMPT: &str = include_str!("chat_classification.md");

/// Get the system prompt for injury screening
#[must_use]
pub const fn get_injury_screening_prompt() -> &'static str {
    INJURY_SCREENING_PROMPT
}

/// Get the system prompt for chat classification
#[must_use]
pub const fn get_chat_classification_prompt() -> &'static str {
    CHAT_CLASSIFICATION_PROMPT
}
