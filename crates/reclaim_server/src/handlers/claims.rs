//! Claim filing and listing endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use reclaim_core::CoreError;
use reclaim_db::{Claim, ClaimStatus, ClaimWithItem};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub item_id: i64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ClaimListQuery {
    pub status: Option<String>,
}

pub async fn create_claim(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(req): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<Claim>), ApiError> {
    let claim = state
        .claims
        .create(identity, req.item_id, &req.reason)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok((StatusCode::CREATED, Json(claim)))
}

pub async fn my_claims(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(query): Query<ClaimListQuery>,
) -> Result<Json<Vec<ClaimWithItem>>, ApiError> {
    let status = match &query.status {
        Some(s) => Some(
            ClaimStatus::parse(s)
                .ok_or_else(|| state.api_err(CoreError::invalid_field("status")))?,
        ),
        None => None,
    };

    let claims = state
        .claims
        .list_by_claimant(identity, status)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok(Json(claims))
}
