// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::credentials::{env_var, CredentialResolver};
use crate::error::{ProxyError, Result};
use crate::metrics;
use crate::models::{ChatBody, ChatRequest, ImageBody, ImageRequest, NormalizedResponse, StreamBody, StreamRequest, Vendor};
use crate::utils::logging::preview;
use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: BTreeMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

/// Liveness string; not part of the API contract.
pub async fn root_handler() -> &'static str {
    "Provider proxy is running"
}

/// Which providers have a credential configured. Secrets are never echoed.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let resolver = CredentialResolver::new(&state.config.providers);
    let mut checks = BTreeMap::new();
    let mut configured = 0;

    for vendor in Vendor::ALL {
        let check = if resolver.is_configured(vendor) {
            configured += 1;
            HealthCheck {
                status: "ok".to_string(),
                message: format!("{} credential configured", vendor.display_name()),
            }
        } else {
            HealthCheck {
                status: "missing".to_string(),
                message: format!("{} not set", env_var(vendor)),
            }
        };
        checks.insert(vendor.as_str().to_string(), check);
    }

    let status = if configured > 0 {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    Json(HealthResponse {
        status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Prometheus text exposition.
pub async fn metrics_handler() -> Result<Response> {
    let body = metrics::gather_metrics()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// Handler for `/api/chat`
pub async fn chat_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<NormalizedResponse>> {
    let result = async {
        let req = ChatRequest::try_from(parse_body::<ChatBody>(body)?)?;
        info!(
            "Received chat request: provider={}, turns={}, input={}",
            req.provider,
            req.messages.len(),
            req.input.is_some()
        );
        state.proxy.chat(&req).await
    }
    .await;

    observe("/api/chat", result).map(Json)
}

/// Handler for `/api/image`
pub async fn image_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<NormalizedResponse>> {
    let result = async {
        let req = ImageRequest::try_from(parse_body::<ImageBody>(body)?)?;
        info!("Received image request: provider={}, model={}", req.provider, req.model);
        state.proxy.image(&req).await
    }
    .await;

    observe("/api/image", result).map(Json)
}

/// Handler for `/api/chat-stream`: assistant text deltas as a chunked body.
pub async fn chat_stream_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    let result = async {
        let req = StreamRequest::try_from(parse_body::<StreamBody>(body)?)?;
        state.proxy.chat_stream(&req).await
    }
    .await;
    let mut deltas = observe("/api/chat-stream", result)?;

    let body_stream = async_stream::stream! {
        let mut chunk_count = 0;
        while let Some(delta) = deltas.next().await {
            match delta {
                Ok(text) => {
                    chunk_count += 1;
                    yield Ok::<bytes::Bytes, std::convert::Infallible>(bytes::Bytes::from(text));
                }
                Err(e) => {
                    // Headers are already sent; ending the body is all that is left
                    warn!("Stream aborted after {} chunks: {}", chunk_count, e);
                    break;
                }
            }
        }
        debug!("Stream finished after {} chunks", chunk_count);
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .header("X-Accel-Buffering", "no")
        .body(Body::from_stream(body_stream))
        .map_err(|e| ProxyError::Internal(format!("Failed to build stream response: {}", e)))
}

/// Deserialize a request body; an empty body is an empty object.
///
/// Extractor rejections (size limit, unreadable body) become `ProxyError`s so
/// they render with the same JSON error shape as everything else.
fn parse_body<T>(body: std::result::Result<Bytes, BytesRejection>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ProxyError::PayloadTooLarge(rejection.body_text())
        } else {
            ProxyError::InvalidRequest(rejection.body_text())
        }
    })?;

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let text = std::str::from_utf8(&body)
        .map_err(|e| ProxyError::InvalidRequest(format!("Request body is not valid UTF-8: {}", e)))?;

    serde_json::from_str(text).map_err(|e| {
        debug!("Rejected body (first 500 chars): {}", preview(text, 500));
        ProxyError::InvalidRequest(format!("JSON deserialization error: {}", e))
    })
}

/// Log and count a failed request before it becomes a JSON error response.
fn observe<T>(endpoint: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        metrics::record_error(endpoint, e.kind());
        if e.status_code().is_server_error() {
            error!("{} failed: {}", endpoint, preview(&e.to_body().to_string(), 1000));
        } else {
            warn!("{} rejected: {}", endpoint, e);
        }
    }
    result
}
