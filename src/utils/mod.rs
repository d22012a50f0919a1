//! Utility functions and helpers for the provider proxy.
//!
//! This module provides cross-cutting concerns like structured logging,
//! credential sanitization, and the opt-in retry policy for upstream calls.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization with security filters.
//! - `retry`: Bounded retry with backoff that respects `Retry-After` hints.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod retry;
