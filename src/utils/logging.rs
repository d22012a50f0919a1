//! Structured logging and security-focused trace utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing utilities to prevent
//! provider API keys from leaking into logs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{ProxyError, Result};
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Whether [`scrub`] redacts; set from `LoggingConfig::sanitize_tokens`.
static SANITIZE: AtomicBool = AtomicBool::new(true);

/// Lazily initialized credential patterns
static SECRET_PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn secret_patterns() -> &'static [(Regex, &'static str)] {
    SECRET_PATTERNS.get_or_init(|| {
        vec![
            // Authorization header values, whatever the token format
            (
                Regex::new(r"(?i)bearer\s+[^\s,;]+").expect("Invalid regex pattern"),
                "Bearer [REDACTED]",
            ),
            // Hugging Face user access tokens
            (
                Regex::new(r"hf_[A-Za-z0-9]{8,}").expect("Invalid regex pattern"),
                "[REDACTED_HF_TOKEN]",
            ),
            // OpenRouter keys, before the generic OpenAI pattern
            (
                Regex::new(r"sk-or-[A-Za-z0-9_-]{8,}").expect("Invalid regex pattern"),
                "[REDACTED_OPENROUTER_KEY]",
            ),
            (
                Regex::new(r"sk-[A-Za-z0-9_-]{16,}").expect("Invalid regex pattern"),
                "[REDACTED_API_KEY]",
            ),
        ]
    })
}

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    SANITIZE.store(config.sanitize_tokens, Ordering::Relaxed);

    // Configure filter from environment or config file
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ProxyError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };

    result.map_err(|e| ProxyError::Internal(format!("Failed to initialize logging: {}", e)))
}

/// Sanitizes provider credentials from log messages.
///
/// Replaces bearer header values, Hugging Face tokens (`hf_…`), OpenRouter
/// keys (`sk-or-…`) and OpenAI-style keys (`sk-…`) with placeholders.
pub fn sanitize(input: &str) -> String {
    secret_patterns()
        .iter()
        .fold(input.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

/// [`sanitize`] unless sanitization was disabled in the logging config.
pub fn scrub(input: &str) -> String {
    if SANITIZE.load(Ordering::Relaxed) {
        sanitize(input)
    } else {
        input.to_string()
    }
}

/// Truncate long upstream bodies before logging them.
pub fn preview(input: &str, max_chars: usize) -> String {
    let scrubbed = scrub(input);
    if scrubbed.chars().count() > max_chars {
        format!("{}…", scrubbed.chars().take(max_chars).collect::<String>())
    } else {
        scrubbed
    }
}
