// ABOUTME: LLM-backed injury/pain screening with a fixed conservative fallback
// ABOUTME: Turns free-text symptom reports into bounded-risk InjuryAssessment records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

//! # Injury Screening
//!
//! This module turns unstructured, user-reported symptoms into a structured
//! [`InjuryAssessment`] suitable for display. It is a boundary adapter
//! between free text and a strongly typed contract, with a safety-first
//! default: under uncertainty the system always recommends caution rather
//! than silently under-reporting risk.
//!
//! ## Contract
//!
//! [`assess_symptoms`] never returns an error. Any failure — the provider
//! cannot be reached, the reply is not JSON, the JSON violates the schema —
//! is logged and replaced with [`InjuryAssessment::fallback`], which flags a
//! possible injury at moderate severity and recommends professional
//! consultation. Each call is independent and stateless: no retry, no
//! caching, no persistence of the result.
//!
//! ## Example
//!
//! ```rust,no_run
//! use forma_ai::intelligence::injury::{assess_symptoms, ExperienceLevel, SymptomContext};
//! use forma_ai::llm::LlmProvider;
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let context = SymptomContext::default()
//!         .with_pain_level(7)
//!         .with_experience_level(ExperienceLevel::Intermediate);
//!     let assessment = assess_symptoms(
//!         provider,
//!         "Sharp pain in shoulder during bench press",
//!         &context,
//!         None,
//!     )
//!     .await;
//!     if assessment.should_see_doctor {
//!         println!("{}", assessment.summary);
//!     }
//! }
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::extract_json;
use crate::errors::AppError;
use crate::llm::{get_injury_screening_prompt, ChatMessage, ChatRequest, LlmProvider};

/// Temperature for screening requests; low for consistent triage
const SCREENING_TEMPERATURE: f32 = 0.2;

/// Token bound for screening replies
const SCREENING_MAX_TOKENS: u32 = 1024;

// ============================================================================
// Assessment Types
// ============================================================================

/// Apparent severity of a reported issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjurySeverity {
    /// Minor discomfort; training can usually continue with modification
    Mild,
    /// Meaningful symptoms; the aggravating activity should stop
    Moderate,
    /// Strong symptoms; professional care before any return to training
    Severe,
}

impl InjurySeverity {
    /// API/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl Display for InjurySeverity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// Less than a year of consistent training
    Beginner,
    /// Comfortable with common movements and programming
    Intermediate,
    /// Multiple years of structured training
    Advanced,
}

impl ExperienceLevel {
    /// API string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// Optional structured context accompanying a symptom report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymptomContext {
    /// Recent activities (e.g., "Bench press 5x5", "10K tempo run")
    pub recent_activities: Vec<String>,
    /// Prior injuries the user has reported
    pub injury_history: Vec<String>,
    /// Self-rated pain on a 1-10 scale
    pub pain_level: Option<u8>,
    /// Self-reported training experience
    pub experience_level: Option<ExperienceLevel>,
}

impl SymptomContext {
    /// Set the pain rating (clamped to the 1-10 scale)
    #[must_use]
    pub fn with_pain_level(mut self, pain_level: u8) -> Self {
        self.pain_level = Some(pain_level.clamp(1, 10));
        self
    }

    /// Set the experience level
    #[must_use]
    pub const fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = Some(level);
        self
    }

    /// Set the recent activity list
    #[must_use]
    pub fn with_recent_activities(mut self, activities: Vec<String>) -> Self {
        self.recent_activities = activities;
        self
    }

    /// Set the injury history list
    #[must_use]
    pub fn with_injury_history(mut self, history: Vec<String>) -> Self {
        self.injury_history = history;
        self
    }
}

/// Structured, bounded-risk assessment of a symptom report
///
/// Created fresh per call and discarded by the caller after use; the crate
/// never persists these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryAssessment {
    /// Whether the report sounds like a possible training injury
    pub injury_detected: bool,
    /// Model confidence in the assessment, always within [0, 1]
    pub confidence: f64,
    /// Apparent severity
    pub severity: InjurySeverity,
    /// Body area the symptoms point to
    #[serde(default)]
    pub affected_area: String,
    /// Plain-language summary of what the symptoms suggest
    #[serde(default)]
    pub summary: String,
    /// Actionable, conservative suggestions
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Symptoms that warrant stopping and seeking care immediately
    #[serde(default)]
    pub warning_signs: Vec<String>,
    /// Whether professional consultation is advised
    pub should_see_doctor: bool,
}

impl InjuryAssessment {
    /// The fixed conservative fallback substituted on any failure path
    ///
    /// Flags a possible injury at moderate severity with middling confidence
    /// and advises professional consultation. Returning this instead of an
    /// error is a deliberate product-safety decision: a health-adjacent
    /// feature degrades to caution, never to a crash or a silent all-clear.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            injury_detected: true,
            confidence: 0.5,
            severity: InjurySeverity::Moderate,
            affected_area: "unspecified".to_owned(),
            summary: "We couldn't fully assess your symptoms. To be safe, treat this as a \
                      possible injury until a professional has taken a look."
                .to_owned(),
            recommendations: vec![
                "Stop or scale back any activity that reproduces the symptoms".to_owned(),
                "Consult a qualified healthcare professional before resuming hard training"
                    .to_owned(),
            ],
            warning_signs: vec![
                "Pain that worsens, spreads, or persists at rest".to_owned(),
                "Numbness, tingling, or loss of strength".to_owned(),
            ],
            should_see_doctor: true,
        }
    }
}

// ============================================================================
// Red-Flag Screening
// ============================================================================

/// Category of an emergency symptom phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlagCategory {
    /// Chest pain, pressure, or tightness
    ChestSymptoms,
    /// Numbness, tingling, loss of sensation or movement
    NeurologicalSymptoms,
    /// Audible pop/snap, visible deformity, inability to bear weight
    StructuralFailure,
    /// Dizziness, fainting, vomiting
    SystemicSymptoms,
}

/// An emergency symptom phrase detected in a report
#[derive(Debug, Clone)]
pub struct RedFlag {
    /// Category of the matched phrase
    pub category: RedFlagCategory,
    /// Original matched text
    pub original: String,
    /// Start position in the report
    pub start: usize,
    /// End position in the report
    pub end: usize,
}

/// Regex patterns for emergency symptom phrases
/// Stored as Option to handle compilation failures gracefully (should never fail for static patterns)
static CHEST_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\bchest\s+(pain|pressure|tightness)\b").ok()
});

static NEURO_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: numbness, tingling, can't feel / no feeling in, lost sensation
    Regex::new(r"(?i)\b(numb(ness)?|tingling|pins and needles|(can't|cannot|no)\s+feel(ing)?|lost?\s+(of\s+)?sensation)\b").ok()
});

static STRUCTURAL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: heard/felt a pop or snap, looks deformed, can't bear weight, can't move
    Regex::new(r"(?i)\b((heard|felt)\s+(a\s+)?(pop|snap|crack)|deform(ed|ity)|(can't|cannot|unable to)\s+(bear weight|put weight|move))\b").ok()
});

static SYSTEMIC_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(dizzy|dizziness|faint(ed|ing)?|passed out|vomit(ed|ing)?)\b").ok()
});

/// Detect emergency symptom phrases in a report
///
/// This screen never alters the classifier's output contract: callers may
/// surface red flags directly, and [`assess_symptoms`] logs their presence,
/// but the assessment returned is always the provider's (or the fallback).
#[must_use]
pub fn detect_red_flags(text: &str) -> Vec<RedFlag> {
    let mut flags = Vec::new();

    let patterns: [(&LazyLock<Option<Regex>>, RedFlagCategory); 4] = [
        (&CHEST_PATTERN, RedFlagCategory::ChestSymptoms),
        (&NEURO_PATTERN, RedFlagCategory::NeurologicalSymptoms),
        (&STRUCTURAL_PATTERN, RedFlagCategory::StructuralFailure),
        (&SYSTEMIC_PATTERN, RedFlagCategory::SystemicSymptoms),
    ];

    for (pattern, category) in patterns {
        if let Some(regex) = pattern.as_ref() {
            for matched in regex.find_iter(text) {
                flags.push(RedFlag {
                    category,
                    original: matched.as_str().to_owned(),
                    start: matched.start(),
                    end: matched.end(),
                });
            }
        }
    }

    // Sort by position for stable presentation
    flags.sort_by_key(|f| f.start);
    flags
}

/// Check if a report contains any emergency symptom phrases
#[must_use]
pub fn contains_red_flags(text: &str) -> bool {
    !detect_red_flags(text).is_empty()
}

// ============================================================================
// Screening Service
// ============================================================================

/// Screen a symptom report for a possible training injury
///
/// Composes a prompt from the report, optional structured context, and
/// optional retrieved background text; calls the provider with a low
/// temperature and a token bound; extracts and validates the JSON reply.
///
/// This function is infallible by contract. Remote-call failures and
/// response-shape failures both degrade to [`InjuryAssessment::fallback`] —
/// they are distinguished only in logging, where telemetry can tell
/// can't-reach-service from service-replied-garbage.
pub async fn assess_symptoms(
    provider: &dyn LlmProvider,
    description: &str,
    context: &SymptomContext,
    background: Option<&str>,
) -> InjuryAssessment {
    let red_flags = detect_red_flags(description);
    if !red_flags.is_empty() {
        warn!(
            count = red_flags.len(),
            categories = ?red_flags.iter().map(|f| f.category).collect::<Vec<_>>(),
            "Symptom report contains red-flag phrases"
        );
    }

    debug!(
        pain_level = ?context.pain_level,
        experience = ?context.experience_level,
        "Screening symptom report"
    );

    let messages = vec![
        ChatMessage::system(get_injury_screening_prompt()),
        ChatMessage::user(build_screening_prompt(description, context, background)),
    ];

    let request = ChatRequest::new(messages)
        .with_temperature(SCREENING_TEMPERATURE)
        .with_max_tokens(SCREENING_MAX_TOKENS);

    let response = match provider.complete(&request).await {
        Ok(response) => response,
        Err(error) => {
            warn!(error = %error, "Injury screening LLM call failed, returning conservative fallback");
            return InjuryAssessment::fallback();
        }
    };

    match parse_assessment(&response.content) {
        Ok(assessment) => assessment,
        Err(error) => {
            warn!(error = %error, "Injury screening reply failed validation, returning conservative fallback");
            InjuryAssessment::fallback()
        }
    }
}

/// Compose the user prompt from the report and its optional context
fn build_screening_prompt(
    description: &str,
    context: &SymptomContext,
    background: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Please screen this report for a possible training injury.\n\nSymptoms:\n{description}\n"
    );

    if let Some(pain) = context.pain_level {
        prompt.push_str(&format!("\nPain level (1-10): {}\n", pain.clamp(1, 10)));
    }

    if let Some(level) = context.experience_level {
        prompt.push_str(&format!("Experience level: {}\n", level.as_str()));
    }

    if !context.recent_activities.is_empty() {
        prompt.push_str("\nRecent activities:\n");
        for activity in &context.recent_activities {
            prompt.push_str(&format!("- {activity}\n"));
        }
    }

    if !context.injury_history.is_empty() {
        prompt.push_str("\nInjury history:\n");
        for entry in &context.injury_history {
            prompt.push_str(&format!("- {entry}\n"));
        }
    }

    if let Some(background) = background.filter(|b| !b.trim().is_empty()) {
        prompt.push_str(&format!("\nBackground:\n{background}\n"));
    }

    prompt.push_str("\nReturn your assessment as JSON.");
    prompt
}

/// Parse and validate an LLM reply into an assessment
///
/// The parsed record is returned unchanged when it satisfies the schema.
/// Out-of-range confidence is a schema violation, not something to clamp:
/// a reply that breaks one invariant is not trusted on the others.
fn parse_assessment(reply: &str) -> Result<InjuryAssessment, AppError> {
    let json = extract_json(reply)?;

    let assessment: InjuryAssessment = serde_json::from_str(&json).map_err(|e| {
        AppError::serialization(format!("Injury assessment did not match schema: {e}"))
    })?;

    if !(0.0..=1.0).contains(&assessment.confidence) {
        return Err(AppError::value_out_of_range(format!(
            "Assessment confidence {} outside [0, 1]",
            assessment.confidence
        )));
    }

    Ok(assessment)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_conservative() {
        let fallback = InjuryAssessment::fallback();
        assert!(fallback.injury_detected);
        assert!((fallback.confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(fallback.severity, InjurySeverity::Moderate);
        assert!(fallback.should_see_doctor);
        assert!(!fallback.recommendations.is_empty());
    }

    #[test]
    fn test_parse_assessment_valid() {
        let reply = r#"{
            "injury_detected": false,
            "confidence": 0.9,
            "severity": "mild",
            "affected_area": "quadriceps",
            "summary": "Sounds like ordinary post-workout soreness.",
            "recommendations": ["Light movement and hydration"],
            "warning_signs": [],
            "should_see_doctor": false
        }"#;

        let assessment = parse_assessment(reply).unwrap();
        assert!(!assessment.injury_detected);
        assert_eq!(assessment.severity, InjurySeverity::Mild);
    }

    #[test]
    fn test_parse_assessment_rejects_out_of_range_confidence() {
        let reply = r#"{
            "injury_detected": true,
            "confidence": 1.5,
            "severity": "mild",
            "should_see_doctor": false
        }"#;

        assert!(parse_assessment(reply).is_err());
    }

    #[test]
    fn test_parse_assessment_rejects_unknown_severity() {
        let reply = r#"{
            "injury_detected": true,
            "confidence": 0.8,
            "severity": "catastrophic",
            "should_see_doctor": true
        }"#;

        assert!(parse_assessment(reply).is_err());
    }

    #[test]
    fn test_red_flags_detected() {
        let flags = detect_red_flags("Felt a pop in my knee and now I can't bear weight on it");
        assert_eq!(flags.len(), 2);
        assert!(flags
            .iter()
            .all(|f| f.category == RedFlagCategory::StructuralFailure));
    }

    #[test]
    fn test_ordinary_soreness_is_not_a_red_flag() {
        assert!(!contains_red_flags(
            "Sharp pain in shoulder during bench press"
        ));
        assert!(!contains_red_flags("Legs are sore after squats"));
    }

    #[test]
    fn test_prompt_includes_context() {
        let context = SymptomContext::default()
            .with_pain_level(7)
            .with_experience_level(ExperienceLevel::Intermediate)
            .with_recent_activities(vec!["Bench press 5x5".to_owned()]);

        let prompt = build_screening_prompt("Shoulder pain", &context, Some("prior shoulder note"));
        assert!(prompt.contains("Shoulder pain"));
        assert!(prompt.contains("Pain level (1-10): 7"));
        assert!(prompt.contains("intermediate"));
        assert!(prompt.contains("Bench press 5x5"));
        assert!(prompt.contains("prior shoulder note"));
    }

    #[test]
    fn test_pain_level_clamped() {
        let context = SymptomContext::default().with_pain_level(99);
        assert_eq!(context.pain_level, Some(10));
    }
}
