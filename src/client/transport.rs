// Proxy and direct chat transports
// Author: kelexine (https://github.com/kelexine)

use super::ChatTransport;
use crate::error::{ProxyError, Result};
use crate::models::{ChatBody, ChatRequest, NormalizedResponse};
use crate::proxy::ProviderProxy;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Error label for a proxy that answered with an error.
pub const PROXY_ERROR: &str = "Proxy error";

/// Sends requests to a running proxy's `/api/chat`.
pub struct ProxyTransport {
    http_client: Client,
    chat_url: String,
}

impl ProxyTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            chat_url: format!("{}/api/chat", base_url.trim().trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ChatTransport for ProxyTransport {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn send(&self, request: &ChatRequest) -> Result<NormalizedResponse> {
        debug!("Sending chat request via proxy at {}", self.chat_url);

        let response = self
            .http_client
            .post(&self.chat_url)
            .json(&ChatBody::from(request))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => Value::String(text),
        };

        if !status.is_success() {
            return Err(ProxyError::Upstream {
                context: PROXY_ERROR,
                status: Some(status.as_u16()),
                details: body,
            });
        }

        Ok(serde_json::from_value(body)?)
    }
}

/// Calls providers straight from the caller with client-held keys.
///
/// Wraps a local [`ProviderProxy`], so the payloads and reply parsing are
/// exactly those of the server.
pub struct DirectTransport {
    proxy: ProviderProxy,
}

impl DirectTransport {
    pub fn new(proxy: ProviderProxy) -> Self {
        Self { proxy }
    }
}

#[async_trait]
impl ChatTransport for DirectTransport {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn send(&self, request: &ChatRequest) -> Result<NormalizedResponse> {
        self.proxy.chat(request).await
    }
}
