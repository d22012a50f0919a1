//! Data models for the provider proxy.
//!
//! This module contains the request/response shapes exchanged with callers and
//! the closed provider sets the proxy routes to:
//! - Provider selectors and upstream vendors (`provider`)
//! - Chat and streaming requests (`chat`)
//! - Image generation requests (`image`)
//! - The normalized reply returned to callers (`response`)

// Author: kelexine (https://github.com/kelexine)

pub mod chat;
pub mod image;
pub mod provider;
pub mod response;

pub use chat::{ChatBody, ChatMessage, ChatRequest, Role, StreamBody, StreamRequest};
pub use image::{ImageBody, ImageRequest};
pub use provider::{ChatProvider, ImageProvider, Vendor};
pub use response::NormalizedResponse;

/// Treats `None`, empty and whitespace-only strings alike, the way the
/// browser callers send unset fields.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
