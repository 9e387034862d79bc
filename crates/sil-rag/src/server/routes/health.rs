//! Liveness and readiness endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::server::state::AppState;
use crate::types::{Health, Readiness};

/// GET /healthz
pub async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(state.pipeline().health())
}

/// GET /readyz - 503 while any provider is unavailable
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let readiness = state.pipeline().readiness().await;
    let status = if readiness.ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(readiness))
}
