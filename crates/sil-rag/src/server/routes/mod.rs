//! HTTP routes

pub mod chat;
pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// All routes, with the upload body limit applied to `/upload` only
pub fn routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
}
