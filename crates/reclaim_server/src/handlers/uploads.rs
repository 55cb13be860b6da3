//! Image upload endpoint.
//!
//! Accepts one multipart `file` field, hands the bytes to the blob store,
//! and returns the opaque reference that item creation accepts as
//! `imageRef`.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use reclaim_core::CoreError;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_ref: String,
}

pub async fn upload(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| state.api_err(CoreError::invalid_field("file")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| state.api_err(CoreError::invalid_field("file")))?;

        if bytes.is_empty() {
            return Err(state.api_err(CoreError::invalid_field("file")));
        }

        let image_ref = state
            .blobs
            .store(&bytes, &original_name)
            .map_err(|e| state.api_err(CoreError::Internal(e.to_string())))?;

        return Ok((StatusCode::CREATED, Json(UploadResponse { image_ref })));
    }

    Err(state.api_err(CoreError::invalid_field("file")))
}
