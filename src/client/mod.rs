//! Caller-side chat transports.
//!
//! The browser UI talks to the proxy first and, when the proxy is unreachable
//! or fails, calls the provider directly with a client-held key. Both paths
//! are [`ChatTransport`]s behind the same request/response normalizers, and
//! [`FallbackChat`] strings them together with a capped multi-turn transcript.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod conversation;
mod fallback;
mod transport;

pub use conversation::{Conversation, MAX_REPLAYED_TURNS};
pub use fallback::{canned_reply, ChatReply, FallbackChat, ReplySource};
pub use transport::{DirectTransport, ProxyTransport};

use crate::error::Result;
use crate::models::{ChatRequest, NormalizedResponse};
use async_trait::async_trait;

/// One way of getting a chat request answered.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Short name for logs ("proxy", "direct").
    fn name(&self) -> &'static str;

    async fn send(&self, request: &ChatRequest) -> Result<NormalizedResponse>;
}
