// Proxy-then-direct chat with canned last resort
// Author: kelexine (https://github.com/kelexine)

use super::conversation::Conversation;
use super::transport::PROXY_ERROR;
use super::ChatTransport;
use crate::error::ProxyError;
use crate::models::{ChatMessage, ChatProvider, ChatRequest};
use serde_json::Value;
use tracing::{info, warn};

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Primary,
    Fallback,
    Canned,
}

/// A reply plus the errors met on the way, for display.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    pub source: ReplySource,
    pub notices: Vec<String>,
}

/// Chat session that tries each transport in turn.
pub struct FallbackChat {
    primary: Box<dyn ChatTransport>,
    fallback: Option<Box<dyn ChatTransport>>,
    provider: ChatProvider,
    model: Option<String>,
    multiturn: bool,
    conversation: Conversation,
}

impl FallbackChat {
    pub fn new(primary: Box<dyn ChatTransport>, provider: ChatProvider) -> Self {
        Self {
            primary,
            fallback: None,
            provider,
            model: None,
            multiturn: false,
            conversation: Conversation::new(),
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn ChatTransport>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_multiturn(mut self, multiturn: bool) -> Self {
        self.multiturn = multiturn;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Request for `text`, replaying recent history in multi-turn mode.
    ///
    /// Hugging Face gets the history plus `input`; the OpenAI-compatible
    /// providers get the new turn appended to `messages`.
    pub fn build_request(&self, text: &str) -> ChatRequest {
        let history = if self.multiturn {
            self.conversation.recent().to_vec()
        } else {
            Vec::new()
        };

        let mut request = ChatRequest::new(self.provider);
        request.model = self.model.clone();
        match self.provider {
            ChatProvider::HuggingFace => {
                request.messages = history;
                request.input = Some(text.to_string());
            }
            ChatProvider::HfRouter | ChatProvider::OpenRouter => {
                let mut messages = history;
                messages.push(ChatMessage::user(text));
                request.messages = messages;
            }
        }
        request
    }

    /// Send one user message and record the exchange.
    pub async fn send(&mut self, text: &str) -> ChatReply {
        let request = self.build_request(text);
        let mut notices = Vec::new();

        let mut reply = self
            .attempt(self.primary.as_ref(), &request, &mut notices)
            .await
            .map(|text| (text, ReplySource::Primary));

        if reply.is_none() {
            if let Some(fallback) = self.fallback.as_deref() {
                reply = self
                    .attempt(fallback, &request, &mut notices)
                    .await
                    .map(|text| (text, ReplySource::Fallback));
            }
        }

        let (text_out, source) = reply.unwrap_or_else(|| (canned_reply(text), ReplySource::Canned));
        self.conversation.record(text, text_out.clone());

        ChatReply {
            text: text_out,
            source,
            notices,
        }
    }

    async fn attempt(
        &self,
        transport: &dyn ChatTransport,
        request: &ChatRequest,
        notices: &mut Vec<String>,
    ) -> Option<String> {
        match transport.send(request).await {
            Ok(response) => match response.text.filter(|t| !t.is_empty()) {
                Some(text) => {
                    info!("Reply received via {}", transport.name());
                    Some(text)
                }
                None => {
                    warn!("{} returned no text", transport.name());
                    None
                }
            },
            Err(e) => {
                warn!("{} transport failed: {}", transport.name(), e);
                notices.push(describe(&e));
                None
            }
        }
    }
}

/// One-line description of a transport failure, preferring the proxy's own
/// `error` field.
fn describe(err: &ProxyError) -> String {
    match err {
        ProxyError::Upstream {
            context: PROXY_ERROR,
            details,
            status,
        } => {
            let detail = match details.get("error") {
                Some(Value::String(message)) => message.clone(),
                _ => match details {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            };
            match status {
                Some(code) => format!("{} {}: {}", PROXY_ERROR, code, detail),
                None => format!("{}: {}", PROXY_ERROR, detail),
            }
        }
        other => other.to_string(),
    }
}

/// Offline reply used when no transport produced text.
pub fn canned_reply(message: &str) -> String {
    let lc = message.to_lowercase();
    if lc.contains("hello") || lc.contains("hi") {
        "Hello! I am the assistant. How can I help you?".to_string()
    } else if lc.contains("scan") {
        "You can upload a file in the Scan section to analyze it.".to_string()
    } else if lc.contains("contact") {
        "Use the Contact form in the Contact section to reach support.".to_string()
    } else {
        "No AI provider is reachable right now. Configure an API key to enable AI replies.".to_string()
    }
}
