//! Upstream dispatcher for the provider back-ends.
//!
//! One HTTPS POST per request, bearer credential attached, against a fixed
//! endpoint per provider family. Failures keep the upstream status and body so
//! they can be surfaced to the caller for diagnosis.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod client;
pub mod endpoints;

pub use client::{UpstreamClient, UpstreamFailure, UpstreamReply};
