// Provider proxy facade
// Author: kelexine (https://github.com/kelexine)
//
// One request lifecycle: resolve the credential (failing fast when it is
// missing), shape the outbound payload, make one upstream call and normalize
// the reply. Only the configuration and the pooled HTTP client are shared.

use crate::config::AppConfig;
use crate::credentials::CredentialResolver;
use crate::error::{Result, CHAT_FAILED, IMAGE_FAILED, STREAM_FAILED};
use crate::models::{
    ChatRequest, ImageProvider, ImageRequest, NormalizedResponse, StreamRequest, Vendor,
};
use crate::translation::{self, streaming};
use crate::upstream::{endpoints, UpstreamClient};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct ProviderProxy {
    config: Arc<AppConfig>,
    upstream: Arc<UpstreamClient>,
}

impl ProviderProxy {
    pub fn new(config: Arc<AppConfig>) -> Result<Self> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        Ok(Self {
            config,
            upstream: Arc::new(upstream),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn credentials(&self) -> CredentialResolver<'_> {
        CredentialResolver::new(&self.config.providers)
    }

    /// Chat completion across Hugging Face, HF Router and OpenRouter.
    pub async fn chat(&self, req: &ChatRequest) -> Result<NormalizedResponse> {
        let key = self.credentials().resolve(req.provider.into())?;
        let normalized = translation::normalize_chat(req, &self.config.providers)?;
        let url = endpoints::chat_url(&self.config.upstream, req.provider, &normalized.model);

        info!(
            "Chat request: provider={}, model={}",
            req.provider, normalized.model
        );

        let reply = self
            .upstream
            .post_json(req.provider.into(), "chat", &url, &key, &normalized.payload)
            .await
            .map_err(|failure| failure.into_error(CHAT_FAILED))?;

        Ok(translation::normalize_chat_response(req.provider, reply.json_or_text()))
    }

    /// Image generation; the reply carries only a data URI.
    pub async fn image(&self, req: &ImageRequest) -> Result<NormalizedResponse> {
        let key = self.credentials().resolve(req.provider.into())?;
        let payload = translation::normalize_image(req);
        let url = endpoints::image_url(&self.config.upstream, req.provider, &req.model);

        info!(
            "Image request: provider={}, model={}",
            req.provider, req.model
        );

        let reply = self
            .upstream
            .post_json(req.provider.into(), "image", &url, &key, &payload)
            .await
            .map_err(|failure| failure.into_error(IMAGE_FAILED))?;

        match req.provider {
            ImageProvider::HuggingFace => Ok(translation::normalize_binary_image(
                reply.content_type.as_deref(),
                &reply.body,
            )),
            ImageProvider::OpenRouter => translation::normalize_openrouter_image(reply.json_or_text()),
        }
    }

    /// Open an OpenAI streaming completion and pass its text deltas through.
    ///
    /// Errors before the first byte are returned; a mid-stream failure ends
    /// the stream.
    pub async fn chat_stream(&self, req: &StreamRequest) -> Result<BoxStream<'static, Result<String>>> {
        let key = self.credentials().resolve(Vendor::OpenAi)?;
        let payload = translation::normalize_stream(req, &self.config.providers);
        let url = endpoints::stream_url(&self.config.upstream);

        info!("Stream request: model={}", payload.model);

        let bytes = self
            .upstream
            .post_stream(Vendor::OpenAi, "chat_stream", &url, &key, &payload)
            .await
            .map_err(|failure| failure.into_error(STREAM_FAILED))?;

        debug!("Upstream stream opened");
        Ok(streaming::text_deltas(bytes).boxed())
    }
}
