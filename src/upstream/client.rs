// Upstream HTTP client
// Author: kelexine (https://github.com/kelexine)

use crate::config::UpstreamConfig;
use crate::credentials::ApiKey;
use crate::error::{ProxyError, Result};
use crate::metrics;
use crate::models::Vendor;
use crate::utils::logging::preview;
use crate::utils::retry::{is_retryable, parse_retry_after, with_retry, RetryHint};
use bytes::Bytes;
use futures::Stream;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// A 2xx upstream reply, body unread by the dispatcher.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamReply {
    /// Body as JSON; a non-JSON body becomes a JSON string.
    pub fn json_or_text(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
    }
}

/// Why an upstream call did not produce a 2xx reply.
#[derive(Debug)]
pub struct UpstreamFailure {
    /// HTTP status, or `None` when the request never completed.
    pub status: Option<u16>,
    /// Upstream error body (JSON when parseable) or the transport error text.
    pub body: Value,
    pub retry_after: Option<Duration>,
}

impl UpstreamFailure {
    fn transport(err: reqwest::Error) -> Self {
        Self {
            status: None,
            body: Value::String(err.to_string()),
            retry_after: None,
        }
    }

    fn http(status: u16, body: &[u8], retry_after: Option<Duration>) -> Self {
        let body = serde_json::from_slice(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
        Self {
            status: Some(status),
            body,
            retry_after,
        }
    }

    /// Surface as an `Upstream` error under the caller-facing `context` label.
    pub fn into_error(self, context: &'static str) -> ProxyError {
        ProxyError::Upstream {
            context,
            status: self.status,
            details: self.body,
        }
    }
}

impl RetryHint for UpstreamFailure {
    fn is_transient(&self) -> bool {
        self.status.map_or(true, is_retryable)
    }

    fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }
}

/// Shared HTTP client for all provider calls.
pub struct UpstreamClient {
    http_client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Build the pooled HTTP client. No timeout is set unless configured.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls();

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let http_client = builder
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            "Created upstream HTTP client (timeout: {:?}, attempts: {})",
            config.timeout_seconds, config.max_attempts
        );

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// POST a JSON body and return the 2xx reply.
    ///
    /// Runs once unless `max_attempts` allows retrying transient failures.
    pub async fn post_json<T>(
        &self,
        vendor: Vendor,
        operation: &'static str,
        url: &str,
        key: &ApiKey,
        body: &T,
    ) -> std::result::Result<UpstreamReply, UpstreamFailure>
    where
        T: Serialize + ?Sized,
    {
        info!("Calling {} {} at {}", vendor.as_str(), operation, url);
        let start = Instant::now();

        let result = with_retry(operation, self.config.max_attempts, || {
            self.send_once(url, key, body)
        })
        .await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(failure) if failure.status.is_some() => "http_error",
            Err(_) => "transport_error",
        };
        metrics::record_upstream_call(vendor.as_str(), operation, outcome, start.elapsed().as_secs_f64());

        match &result {
            Ok(reply) => debug!(
                "{} {} answered HTTP {} ({} bytes)",
                vendor.as_str(),
                operation,
                reply.status,
                reply.body.len()
            ),
            Err(failure) => error!(
                "{} {} failed: status={:?} body={}",
                vendor.as_str(),
                operation,
                failure.status,
                preview(&failure.body.to_string(), 500)
            ),
        }

        result
    }

    async fn send_once<T>(
        &self,
        url: &str,
        key: &ApiKey,
        body: &T,
    ) -> std::result::Result<UpstreamReply, UpstreamFailure>
    where
        T: Serialize + ?Sized,
    {
        let response = self
            .http_client
            .post(url)
            .header(AUTHORIZATION, key.bearer())
            .json(body)
            .send()
            .await
            .map_err(UpstreamFailure::transport)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);

        let bytes = response.bytes().await.map_err(UpstreamFailure::transport)?;

        if !status.is_success() {
            return Err(UpstreamFailure::http(status.as_u16(), &bytes, retry_after));
        }

        Ok(UpstreamReply {
            status: status.as_u16(),
            content_type,
            body: bytes,
        })
    }

    /// POST a JSON body and hand back the raw response byte stream.
    ///
    /// Always a single attempt; the stream is passed through unbuffered.
    pub async fn post_stream<T>(
        &self,
        vendor: Vendor,
        operation: &'static str,
        url: &str,
        key: &ApiKey,
        body: &T,
    ) -> std::result::Result<impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static, UpstreamFailure>
    where
        T: Serialize + ?Sized,
    {
        info!("Opening {} {} stream at {}", vendor.as_str(), operation, url);
        let start = Instant::now();

        let result = self
            .http_client
            .post(url)
            .header(AUTHORIZATION, key.bearer())
            .header(ACCEPT, "text/event-stream")
            .json(body)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream_call(vendor.as_str(), operation, "transport_error", start.elapsed().as_secs_f64());
                return Err(UpstreamFailure::transport(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            metrics::record_upstream_call(vendor.as_str(), operation, "http_error", start.elapsed().as_secs_f64());
            error!(
                "{} {} stream refused: HTTP {} - {}",
                vendor.as_str(),
                operation,
                status,
                preview(&String::from_utf8_lossy(&bytes), 500)
            );
            return Err(UpstreamFailure::http(status.as_u16(), &bytes, None));
        }

        metrics::record_upstream_call(vendor.as_str(), operation, "success", start.elapsed().as_secs_f64());
        Ok(response.bytes_stream())
    }
}
