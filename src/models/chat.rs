// Chat request types
// Author: kelexine (https://github.com/kelexine)

use super::non_empty;
use super::provider::ChatProvider;
use crate::error::{ProxyError, Result};
use serde::{Deserialize, Serialize};

/// Speaker of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// `/api/chat` body as sent by callers. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ChatMessage>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

/// Provider-agnostic chat request.
///
/// At least one of `messages` or `input` must carry content; when both are
/// present `input` becomes the final user turn. That invariant is checked by
/// the request normalizer, after the credential lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatRequest {
    pub provider: ChatProvider,
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub input: Option<String>,
}

impl ChatRequest {
    pub fn new(provider: ChatProvider) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = non_empty(Some(model.into()));
        self
    }

    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = non_empty(Some(input.into()));
        self
    }

    /// True when there is something to send upstream.
    pub fn has_content(&self) -> bool {
        !self.messages.is_empty() || self.input.is_some()
    }
}

impl TryFrom<ChatBody> for ChatRequest {
    type Error = ProxyError;

    fn try_from(body: ChatBody) -> Result<Self> {
        let provider = match non_empty(body.provider) {
            Some(name) => name.parse()?,
            None => ChatProvider::default(),
        };

        Ok(Self {
            provider,
            model: non_empty(body.model),
            messages: body.messages.unwrap_or_default(),
            input: non_empty(body.input),
        })
    }
}

impl From<&ChatRequest> for ChatBody {
    fn from(req: &ChatRequest) -> Self {
        Self {
            provider: Some(req.provider.as_str().to_string()),
            model: req.model.clone(),
            messages: (!req.messages.is_empty()).then(|| req.messages.clone()),
            input: req.input.clone(),
        }
    }
}

/// `/api/chat-stream` body: a single user message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamBody {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub model: Option<String>,
}

/// Validated streaming request.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    pub message: String,
    pub model: Option<String>,
}

impl TryFrom<StreamBody> for StreamRequest {
    type Error = ProxyError;

    fn try_from(body: StreamBody) -> Result<Self> {
        let message = non_empty(body.message)
            .ok_or_else(|| ProxyError::InvalidRequest("A message is required.".to_string()))?;
        Ok(Self {
            message,
            model: non_empty(body.model),
        })
    }
}
