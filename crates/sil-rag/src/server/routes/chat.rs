//! Chat endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /chat - answer one query
///
/// Generation failures surface as 502 through `Error::into_response`.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    tracing::info!("Query: \"{}\"", request.query);

    let answer = state.pipeline().answer(&request.query).await?;
    Ok(Json(answer.into()))
}
