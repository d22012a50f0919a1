// Request normalization (caller → provider)
// Author: kelexine (https://github.com/kelexine)

use crate::config::ProviderConfig;
use crate::error::{ProxyError, Result};
use crate::models::{ChatMessage, ChatProvider, ChatRequest, ImageProvider, ImageRequest, Role, StreamRequest};
use serde::Serialize;
use tracing::debug;

/// Fallback model for the Hugging Face Inference API.
pub const DEFAULT_HF_MODEL: &str = "facebook/blenderbot-400M-distill";

/// Fallback model for the OpenAI-compatible routers.
pub const DEFAULT_ROUTER_MODEL: &str = "openai/gpt-4o";

/// Fallback model for the streaming endpoint.
pub const DEFAULT_STREAM_MODEL: &str = "gpt-4o-mini";

/// Outbound chat body, in the shape the selected provider expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatPayload {
    /// Hugging Face Inference: one flattened prompt.
    Inputs { inputs: String },
    /// OpenAI-compatible chat completions.
    Completion {
        model: String,
        messages: Vec<ChatMessage>,
    },
}

/// A chat request resolved against a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedChat {
    pub model: String,
    pub payload: ChatPayload,
}

/// Outbound image body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImagePayload {
    Inputs { inputs: String },
    Generation { model: String, prompt: String },
}

/// Outbound streaming chat-completions body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

/// Pick the model: explicit request → provider default from config → constant.
pub fn resolve_model(provider: ChatProvider, requested: Option<&str>, defaults: &ProviderConfig) -> String {
    let configured = match provider {
        ChatProvider::HuggingFace | ChatProvider::HfRouter => defaults.hf_model.as_deref(),
        ChatProvider::OpenRouter => defaults.openrouter_model.as_deref(),
    };
    let fallback = match provider {
        ChatProvider::HuggingFace => DEFAULT_HF_MODEL,
        ChatProvider::HfRouter | ChatProvider::OpenRouter => DEFAULT_ROUTER_MODEL,
    };

    let usable = |m: &&str| !m.trim().is_empty();
    requested
        .filter(usable)
        .or(configured.filter(usable))
        .unwrap_or(fallback)
        .to_string()
}

/// Shape a chat request into its provider payload.
pub fn normalize_chat(req: &ChatRequest, defaults: &ProviderConfig) -> Result<NormalizedChat> {
    if !req.has_content() {
        return Err(ProxyError::InvalidRequest(
            "No messages or input provided.".to_string(),
        ));
    }

    let model = resolve_model(req.provider, req.model.as_deref(), defaults);

    let payload = match req.provider {
        ChatProvider::HuggingFace => ChatPayload::Inputs {
            inputs: flatten_transcript(&req.messages, req.input.as_deref()),
        },
        ChatProvider::HfRouter | ChatProvider::OpenRouter => {
            let mut messages = req.messages.clone();
            if let Some(input) = &req.input {
                messages.push(ChatMessage::user(input.clone()));
            }
            ChatPayload::Completion {
                model: model.clone(),
                messages,
            }
        }
    };

    debug!(
        "Normalized chat request: provider={}, model={}, turns={}",
        req.provider,
        model,
        req.messages.len()
    );

    Ok(NormalizedChat { model, payload })
}

/// Render a transcript as `User: …` / `Assistant: …` lines, with `input` as
/// the trailing user line.
pub fn flatten_transcript(messages: &[ChatMessage], input: Option<&str>) -> String {
    let mut lines: Vec<String> = messages
        .iter()
        .map(|m| match m.role {
            Role::User => format!("User: {}", m.content),
            Role::Assistant => format!("Assistant: {}", m.content),
        })
        .collect();

    match input {
        // Bare input with no history is sent verbatim
        Some(input) if lines.is_empty() => input.to_string(),
        Some(input) => {
            lines.push(format!("User: {}", input));
            lines.join("\n")
        }
        None => lines.join("\n"),
    }
}

/// Shape an image request into its provider payload.
pub fn normalize_image(req: &ImageRequest) -> ImagePayload {
    match req.provider {
        ImageProvider::HuggingFace => ImagePayload::Inputs {
            inputs: req.prompt.clone(),
        },
        ImageProvider::OpenRouter => ImagePayload::Generation {
            model: req.model.clone(),
            prompt: req.prompt.clone(),
        },
    }
}

/// Shape a streaming request into an OpenAI chat-completions body.
pub fn normalize_stream(req: &StreamRequest, defaults: &ProviderConfig) -> StreamPayload {
    let model = req
        .model
        .as_deref()
        .or(defaults.openai_model.as_deref())
        .unwrap_or(DEFAULT_STREAM_MODEL)
        .to_string();

    StreamPayload {
        model,
        messages: vec![ChatMessage::user(req.message.clone())],
        stream: true,
    }
}
