//! Axum-based HTTP server implementation for the provider proxy.
//!
//! This module is responsible for setting up the HTTP server, configuring routes,
//! and handling incoming requests from browser callers. Chat and image requests
//! are forwarded to the configured AI providers and answered with one stable,
//! provider-independent JSON shape.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual API endpoints (chat, image, stream, health, metrics).
//! - `middleware`: Request ID tracking and request metrics.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use routes::{create_router, AppState};
