// ABOUTME: Main library entry point for the Forma AI coaching intelligence layer
// ABOUTME: Provides injury screening and coach chat classification over pluggable LLM providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

#![deny(unsafe_code)]

//! # Forma AI
//!
//! The AI coaching intelligence layer of the Forma fitness backend. This crate
//! turns free-text user input into strongly typed, bounded-risk records that
//! the surrounding application can display directly:
//!
//! - **Injury screening**: user-reported symptoms become an
//!   [`intelligence::injury::InjuryAssessment`] with a conservative fallback
//!   on any failure. The screener never returns an error to its caller.
//! - **Chat classification**: incoming coach-chat messages become an
//!   [`intelligence::chat::ChatClassification`] used for routing, with the
//!   same never-throw contract.
//!
//! Both features delegate text generation to the [`llm`] provider layer,
//! configured entirely from the environment.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forma_ai::intelligence::injury::{assess_symptoms, SymptomContext};
//! use forma_ai::llm::GroqProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), forma_ai::errors::AppError> {
//!     let provider = GroqProvider::from_env()?;
//!     let context = SymptomContext::default().with_pain_level(7);
//!     let assessment = assess_symptoms(
//!         &provider,
//!         "Sharp pain in shoulder during bench press",
//!         &context,
//!         None,
//!     )
//!     .await;
//!     println!("see a doctor: {}", assessment.should_see_doctor);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`llm`**: The `LlmProvider` trait plus the production Groq backend
//! - **`intelligence`**: The classifiers built on top of the provider trait
//! - **`config`**: Environment-only configuration types
//! - **`errors`**: Unified error handling shared across modules
//! - **`logging`**: Structured `tracing` setup for the consuming backend

/// Environment-driven configuration types
pub mod config;

/// Unified error handling system
pub mod errors;

/// AI classifiers: injury screening and chat classification
pub mod intelligence;

/// LLM provider abstraction layer
pub mod llm;

/// Structured logging configuration
pub mod logging;
