// ABOUTME: Intelligence module root for the AI coaching classifiers
// ABOUTME: Hosts injury screening, chat classification, and shared LLM reply parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

//! # Coaching Intelligence
//!
//! The classifiers that turn free-text user input into typed records:
//!
//! - [`injury`]: injury/pain screening with a conservative fallback
//! - [`chat`]: coach-chat message classification for routing
//!
//! Both share the same boundary-adapter shape: compose a prompt, call the
//! configured LLM provider, extract and validate the JSON reply, and degrade
//! to a fixed safe record on any failure.

/// Coach-chat message classification
pub mod chat;

/// Injury/pain screening
pub mod injury;

use crate::errors::AppError;

/// Extract JSON from an LLM reply that might contain extra text
///
/// Models occasionally wrap their JSON in prose or markdown code fences even
/// when told not to. Tries, in order: the whole reply, the outermost brace
/// span, and the body of a ```json code block.
pub(crate) fn extract_json(response: &str) -> Result<String, AppError> {
    // First try: parse the whole response as JSON
    if serde_json::from_str::<serde_json::Value>(response).is_ok() {
        return Ok(response.to_owned());
    }

    // Second try: find a JSON object in the response. The closing brace is
    // searched only after the opening one; a reply like "}... {" has no
    // object span and must fall through, not slice out of order.
    if let Some(start) = response.find('{') {
        if let Some(offset) = response[start..].rfind('}') {
            let json_candidate = &response[start..=start + offset];
            if serde_json::from_str::<serde_json::Value>(json_candidate).is_ok() {
                return Ok(json_candidate.to_owned());
            }
        }
    }

    // Third try: look for JSON in code blocks
    if let Some(start) = response.find("```json") {
        if let Some(end) = response[start + 7..].find("```") {
            let json_block = &response[start + 7..start + 7 + end];
            return extract_json(json_block.trim());
        }
    }

    Err(AppError::serialization(
        "Could not extract valid JSON from LLM response",
    ))
}
