//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// POST /upload - store the multipart `file` field under the docs dir and index it
///
/// Unsupported file types are stored but not indexed, and still answer `ok`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidRequest(format!("Failed to read file: {}", e)))?;

        tracing::info!("Upload: {} ({} bytes)", filename, data.len());

        let outcome = state.pipeline().upload(&filename, &data).await?;
        return Ok(Json(UploadResponse {
            ok: true,
            stored_as: outcome.stored_as,
            chunks_indexed: outcome.chunks_indexed,
        }));
    }

    Err(Error::InvalidRequest("missing multipart field 'file'".into()))
}
