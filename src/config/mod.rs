// ABOUTME: Configuration module root re-exporting environment-driven config types
// ABOUTME: All configuration is environment-only; no config files are read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

//! # Configuration
//!
//! Environment-only configuration. The crate reads a handful of variables
//! (`GROQ_API_KEY`, `FORMA_LLM_MODEL`, `RUST_LOG`, `LOG_FORMAT`,
//! `ENVIRONMENT`) through typed accessors with defaults; nothing comes from
//! disk.

/// Typed configuration values
pub mod types;

pub use types::{Environment, LogLevel};
