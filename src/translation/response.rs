// Response normalization (provider → caller)
// Author: kelexine (https://github.com/kelexine)

use crate::error::{ProxyError, Result};
use crate::models::{ChatProvider, NormalizedResponse};
use base64::Engine;
use serde_json::Value;
use tracing::{debug, warn};

/// MIME type assumed when the upstream declares none.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Map a successful chat payload to `{ text, raw }`. Never fails: unknown
/// shapes are stringified.
pub fn normalize_chat_response(provider: ChatProvider, raw: Value) -> NormalizedResponse {
    let text = match provider {
        ChatProvider::HuggingFace => generated_text(&raw),
        ChatProvider::HfRouter | ChatProvider::OpenRouter => completion_text(&raw),
    }
    .unwrap_or_else(|| {
        debug!("Unrecognized {} response shape, returning it verbatim", provider);
        stringify(&raw)
    });

    NormalizedResponse::text(text, raw)
}

/// Hugging Face: `[{generated_text}]` or `{generated_text}`.
fn generated_text(raw: &Value) -> Option<String> {
    let from = |v: &Value| non_empty_str(v.get("generated_text"));
    match raw {
        Value::Array(items) => items.first().and_then(from),
        _ => from(raw),
    }
}

/// OpenAI-compatible: `choices[0].message.content`, then `choices[0].text`.
fn completion_text(raw: &Value) -> Option<String> {
    let choice = raw.get("choices")?.get(0)?;
    non_empty_str(choice.get("message").and_then(|m| m.get("content")))
        .or_else(|| non_empty_str(choice.get("text")))
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A bare JSON string is already text; anything else is serialized.
fn stringify(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Wrap a base64 payload as a data URI.
pub fn data_uri(mime: &str, base64_payload: &str) -> String {
    format!("data:{};base64,{}", mime, base64_payload)
}

/// Binary image reply (Hugging Face) → data URI using the declared type.
pub fn normalize_binary_image(content_type: Option<&str>, body: &[u8]) -> NormalizedResponse {
    let mime = content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME);
    let encoded = base64::engine::general_purpose::STANDARD.encode(body);

    debug!("Encoded {} byte image as {}", body.len(), mime);
    NormalizedResponse::data_uri(data_uri(mime, &encoded))
}

/// OpenRouter image reply: `data[0].b64_json` → PNG data URI.
///
/// A missing payload is an error carrying the raw reply; no placeholder image
/// is ever substituted.
pub fn normalize_openrouter_image(raw: Value) -> Result<NormalizedResponse> {
    let encoded = raw
        .get("data")
        .and_then(|d| d.get(0))
        .and_then(|item| non_empty_str(item.get("b64_json")));

    match encoded {
        Some(b64) => Ok(NormalizedResponse::data_uri(data_uri(DEFAULT_IMAGE_MIME, &b64))),
        None => {
            warn!("OpenRouter image response carried no b64_json payload");
            Err(ProxyError::UnexpectedResponse {
                context: UNEXPECTED_IMAGE,
                raw,
            })
        }
    }
}

/// Error label for image replies without an image.
pub const UNEXPECTED_IMAGE: &str = "Unexpected image response";
