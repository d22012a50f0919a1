// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    chat_handler, chat_stream_handler, health_handler, image_handler, metrics_handler, root_handler,
};
use super::middleware::{request_id_layers, track_requests};
use crate::config::AppConfig;
use crate::error::Result;
use crate::proxy::ProviderProxy;
use axum::extract::DefaultBodyLimit;
use axum::{middleware, routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request bodies above this size are refused with a JSON 413.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub proxy: ProviderProxy,
}

pub fn create_router(config: Arc<AppConfig>) -> Result<Router> {
    let state = AppState {
        proxy: ProviderProxy::new(config.clone())?,
        config,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/image", post(image_handler))
        .route("/api/chat-stream", post(chat_stream_handler))
        .route_layer(middleware::from_fn(track_requests))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // The browser UI is served from a different origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
