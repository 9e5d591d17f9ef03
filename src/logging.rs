// ABOUTME: Tracing subscriber setup for the consuming backend
// ABOUTME: Env-driven level/format selection with HTTP-client noise filtered out
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Fitness Intelligence

//! # Logging
//!
//! One-shot tracing setup. The consuming backend builds a [`LoggingConfig`]
//! from the environment and calls [`LoggingConfig::init`] once at startup;
//! everything in this crate only emits events and assumes a subscriber is
//! already installed (the classifier fallback paths log at `warn`).

use anyhow::Result;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Environment;

/// How log lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Newline-delimited JSON, for log shippers
    Json,
    /// Human-oriented output for development
    Pretty,
    /// Single-line output without targets
    Compact,
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directives, `RUST_LOG` syntax
    pub level: String,
    /// Output rendering
    pub format: LogFormat,
    /// Attach file and line to each event
    pub include_location: bool,
    /// Attach span open/close events
    pub include_spans: bool,
    /// Deployment environment, echoed in the startup line
    pub environment: Environment,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_spans: false,
            environment: Environment::Development,
        }
    }
}

impl LoggingConfig {
    /// Configuration from `RUST_LOG`, `LOG_FORMAT`, `ENVIRONMENT`, and
    /// `LOG_INCLUDE_LOCATION` / `LOG_INCLUDE_SPANS`
    ///
    /// Production defaults to JSON with locations and spans on; everything
    /// can still be overridden explicitly.
    #[must_use]
    pub fn from_env() -> Self {
        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_default(),
        );

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            Ok("pretty") => LogFormat::Pretty,
            _ if environment.is_production() => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            level: env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            format,
            include_location: environment.is_production()
                || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: environment.is_production() || env::var("LOG_INCLUDE_SPANS").is_ok(),
            environment,
        }
    }

    /// Install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a subscriber is already installed.
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.build_filter());

        let layer = fmt::layer()
            .with_writer(io::stdout)
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_span_events(if self.include_spans {
                FmtSpan::NEW | FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            });

        match self.format {
            LogFormat::Json => registry.with(layer.json()).try_init()?,
            LogFormat::Pretty => registry.with(layer).try_init()?,
            LogFormat::Compact => registry.with(layer.compact().with_target(false)).try_init()?,
        }

        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.environment,
            level = %self.level,
            format = ?self.format,
            "forma-ai logging initialized"
        );

        Ok(())
    }

    /// Filter honoring the configured level while muting HTTP-client chatter
    fn build_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(&self.level);
        for directive in ["hyper=warn", "reqwest=warn"] {
            if let Ok(parsed) = directive.parse() {
                filter = filter.add_directive(parsed);
            }
        }
        filter
    }
}
