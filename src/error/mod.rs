// Error types for provider-proxy
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;

/// Context label for failed `/api/chat` upstream calls.
pub const CHAT_FAILED: &str = "Proxy request failed";

/// Context label for failed `/api/image` upstream calls.
pub const IMAGE_FAILED: &str = "Image generation failed";

/// Context label for failed `/api/chat-stream` upstream calls.
pub const STREAM_FAILED: &str = "Streaming request failed";

#[derive(Error, Debug)]
pub enum ProxyError {
    /// The server holds no secret for the selected provider.
    #[error("{provider} credential ({env_var}) not configured on server.")]
    MissingCredential {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported provider for {operation}: {provider}")]
    UnsupportedProvider {
        operation: &'static str,
        provider: String,
    },

    /// Non-2xx from the provider, or the call never completed.
    #[error("{context}")]
    Upstream {
        context: &'static str,
        status: Option<u16>,
        details: Value,
    },

    /// A 2xx reply whose shape cannot be normalized.
    #[error("{context}")]
    UnexpectedResponse { context: &'static str, raw: Value },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// HTTP status reported to the caller for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingCredential { .. }
            | ProxyError::InvalidRequest(_)
            | ProxyError::UnsupportedProvider { .. } => StatusCode::BAD_REQUEST,
            ProxyError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind, used for metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::MissingCredential { .. } => "missing_credential",
            ProxyError::InvalidRequest(_) => "invalid_request",
            ProxyError::PayloadTooLarge(_) => "payload_too_large",
            ProxyError::UnsupportedProvider { .. } => "unsupported_provider",
            ProxyError::Upstream { .. } | ProxyError::UnexpectedResponse { .. } => "upstream_error",
            ProxyError::Config(_) | ProxyError::ConfigParsing(_) => "configuration_error",
            _ => "internal_error",
        }
    }

    /// Structured JSON body: `{ error, details? | raw? }`.
    pub fn to_body(&self) -> Value {
        let mut body = json!({ "error": self.to_string() });
        match self {
            ProxyError::Upstream { details, .. } => body["details"] = details.clone(),
            ProxyError::UnexpectedResponse { raw, .. } => body["raw"] = raw.clone(),
            _ => {}
        }
        body
    }
}

// Convert ProxyError to HTTP responses for Axum
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), axum::Json(self.to_body())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
