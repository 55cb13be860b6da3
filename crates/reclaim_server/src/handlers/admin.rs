//! Admin console endpoints.
//!
//! Every handler takes the [`AdminUser`] guard, which has already
//! confirmed the admin flag against the credential store.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use reclaim_core::{AdminOverview, CoreError};
use reclaim_db::{Claim, ClaimAdminRow, ClaimStatus, ItemKind, ItemReport, ItemStatus};

use crate::error::ApiError;
use crate::extract::AdminUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

pub async fn overview(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<AdminOverview>, ApiError> {
    let view = state
        .listings
        .admin_overview()
        .await
        .map_err(|e| state.api_err(e))?;

    Ok(Json(view))
}

pub async fn lost_items(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ItemReport>>, ApiError> {
    let items = state
        .listings
        .items_of_kind(ItemKind::Lost)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(Json(items))
}

pub async fn found_items(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ItemReport>>, ApiError> {
    let items = state
        .listings
        .items_of_kind(ItemKind::Found)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(Json(items))
}

pub async fn all_claims(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ClaimAdminRow>>, ApiError> {
    let claims = state
        .listings
        .all_claims()
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(Json(claims))
}

pub async fn set_item_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<ItemReport>, ApiError> {
    let status = ItemStatus::parse(&req.status)
        .ok_or_else(|| state.api_err(CoreError::invalid_field("status")))?;

    let item = state
        .items
        .transition(id, status, admin.identity)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok(Json(item))
}

pub async fn set_claim_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Claim>, ApiError> {
    let status = ClaimStatus::parse(&req.status)
        .ok_or_else(|| state.api_err(CoreError::invalid_field("status")))?;

    let claim = state
        .claims
        .transition(id, status, admin.identity)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok(Json(claim))
}
