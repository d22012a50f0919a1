// Provider endpoint URLs
// Author: kelexine (https://github.com/kelexine)

use crate::config::UpstreamConfig;
use crate::models::{ChatProvider, ImageProvider};

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Hugging Face Inference model URL. Model ids keep their `org/name` slash.
pub fn huggingface_model_url(config: &UpstreamConfig, model: &str) -> String {
    join(&config.huggingface_base_url, &format!("models/{}", model))
}

/// Chat endpoint for `provider`. Only Hugging Face puts the model in the path.
pub fn chat_url(config: &UpstreamConfig, provider: ChatProvider, model: &str) -> String {
    match provider {
        ChatProvider::HuggingFace => huggingface_model_url(config, model),
        ChatProvider::HfRouter => join(&config.hf_router_base_url, "chat/completions"),
        ChatProvider::OpenRouter => join(&config.openrouter_base_url, "chat/completions"),
    }
}

/// Image endpoint for `provider`.
pub fn image_url(config: &UpstreamConfig, provider: ImageProvider, model: &str) -> String {
    match provider {
        ImageProvider::HuggingFace => huggingface_model_url(config, model),
        ImageProvider::OpenRouter => join(&config.openrouter_base_url, "images/generations"),
    }
}

/// OpenAI chat completions, used by the streaming pass-through.
pub fn stream_url(config: &UpstreamConfig) -> String {
    join(&config.openai_base_url, "chat/completions")
}
