//! Contact form endpoint (unauthenticated).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state
        .contact
        .submit(&req.name, &req.email, &req.message)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok((StatusCode::CREATED, Json(json!({ "message": "Message submitted successfully" }))))
}
