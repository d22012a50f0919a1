//! Configuration data structures for the provider proxy.
//!
//! This module defines the schema for the application settings: server
//! binding, provider credentials and default models, upstream endpoints and
//! logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};
use std::fmt;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Server-held provider credentials and default models.
    #[serde(default)]
    pub providers: ProviderConfig,

    /// Upstream endpoint and transport settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `0.0.0.0`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on (`PORT`).
    /// Default: `3000`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Provider secrets and model defaults.
///
/// Secrets are plain strings here so the config layers can deserialize them;
/// they only leave this struct wrapped in a zeroizing `ApiKey`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    /// Hugging Face Inference API token (`HF_API_KEY`).
    #[serde(default)]
    pub hf_api_key: Option<String>,

    /// Hugging Face Router token (`HF_TOKEN`).
    #[serde(default)]
    pub hf_token: Option<String>,

    /// Default Hugging Face model (`HF_MODEL`).
    #[serde(default)]
    pub hf_model: Option<String>,

    /// OpenRouter API key (`OPENROUTER_KEY`).
    #[serde(default)]
    pub openrouter_key: Option<String>,

    /// Default OpenRouter model (`OPENROUTER_MODEL`).
    #[serde(default)]
    pub openrouter_model: Option<String>,

    /// OpenAI API key for the streaming endpoint (`OPENAI_API_KEY`).
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Default streaming model (`OPENAI_MODEL`).
    #[serde(default)]
    pub openai_model: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redacted(secret: &Option<String>) -> Option<&'static str> {
            secret.as_ref().map(|_| "***")
        }

        f.debug_struct("ProviderConfig")
            .field("hf_api_key", &redacted(&self.hf_api_key))
            .field("hf_token", &redacted(&self.hf_token))
            .field("hf_model", &self.hf_model)
            .field("openrouter_key", &redacted(&self.openrouter_key))
            .field("openrouter_model", &self.openrouter_model)
            .field("openai_api_key", &redacted(&self.openai_api_key))
            .field("openai_model", &self.openai_model)
            .finish()
    }
}

/// Settings for the upstream provider connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the Hugging Face Inference API.
    /// Default: `https://api-inference.huggingface.co`
    #[serde(default = "default_huggingface_base_url")]
    pub huggingface_base_url: String,

    /// Base URL of the Hugging Face Router.
    /// Default: `https://router.huggingface.co/v1`
    #[serde(default = "default_hf_router_base_url")]
    pub hf_router_base_url: String,

    /// Base URL of the OpenRouter API.
    /// Default: `https://openrouter.ai/api/v1`
    #[serde(default = "default_openrouter_base_url")]
    pub openrouter_base_url: String,

    /// Base URL of the OpenAI API (streaming endpoint only).
    /// Default: `https://api.openai.com/v1`
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Request timeout in seconds. Unset keeps the HTTP client default.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Total attempts per upstream call; `1` disables retries.
    /// Default: `1`
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask API keys and bearer tokens in logged upstream bodies.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_tokens: bool,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            huggingface_base_url: default_huggingface_base_url(),
            hf_router_base_url: default_hf_router_base_url(),
            openrouter_base_url: default_openrouter_base_url(),
            openai_base_url: default_openai_base_url(),
            timeout_seconds: None,
            max_attempts: default_max_attempts(),
        }
    }
}

impl UpstreamConfig {
    /// Points every provider at the same base URL. Used against mock servers.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            huggingface_base_url: base.clone(),
            hf_router_base_url: base.clone(),
            openrouter_base_url: base.clone(),
            openai_base_url: base,
            ..Default::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_tokens: true,
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_huggingface_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_hf_router_base_url() -> String {
    "https://router.huggingface.co/v1".to_string()
}

fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_attempts() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let providers = ProviderConfig {
            hf_api_key: Some("hf_supersecretvalue".to_string()),
            hf_model: Some("gpt2".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", providers);
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("***"));
        assert!(debug.contains("gpt2"));
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let upstream = UpstreamConfig::with_base_url("http://127.0.0.1:1234/");
        assert_eq!(upstream.openrouter_base_url, "http://127.0.0.1:1234");
        assert_eq!(upstream.max_attempts, 1);
        assert!(upstream.timeout_seconds.is_none());
    }
}
