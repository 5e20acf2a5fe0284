//! # Blob Storage API
//!
//! Proxies uploads and downloads to the configured blob store. With the
//! placeholder store, uploads return fabricated IDs and downloads answer
//! `501`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use wm_core::BlobId;
use wm_walrus::BlobStore;

use crate::error::AppError;
use crate::state::AppState;

/// Identifier of a stored blob.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub blob_id: String,
    /// Which store accepted the upload.
    pub store: String,
}

/// Build the blobs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/blobs", post(upload_blob))
        .route("/v1/blobs/:blob_id", get(fetch_blob))
}

/// POST /v1/blobs — Store raw bytes.
#[utoipa::path(
    post,
    path = "/v1/blobs",
    request_body(content = Vec<u8>, description = "Raw blob bytes", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Blob stored", body = UploadResponse),
        (status = 422, description = "Empty body", body = crate::error::ErrorBody),
        (status = 502, description = "Storage network failure", body = crate::error::ErrorBody),
    ),
    tag = "blobs"
)]
async fn upload_blob(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    if body.is_empty() {
        return Err(AppError::Validation("blob body must not be empty".into()));
    }
    let size = body.len();
    let blob_id = state.blobs.upload(body.to_vec()).await?;
    tracing::info!(blob_id = %blob_id, size, store = state.blobs.kind(), "blob stored");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            blob_id: blob_id.to_string(),
            store: state.blobs.kind().to_string(),
        }),
    ))
}

/// GET /v1/blobs/{blob_id} — Read stored bytes.
#[utoipa::path(
    get,
    path = "/v1/blobs/{blob_id}",
    params(("blob_id" = String, Path, description = "Blob identifier")),
    responses(
        (status = 200, description = "Blob bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "Unknown blob", body = crate::error::ErrorBody),
        (status = 501, description = "Store cannot read blobs", body = crate::error::ErrorBody),
    ),
    tag = "blobs"
)]
async fn fetch_blob(
    State(state): State<AppState>,
    Path(blob_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let blob_id = BlobId::new(blob_id)?;
    let bytes = state.blobs.fetch(&blob_id).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    ))
}
