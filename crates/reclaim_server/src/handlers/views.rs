//! Per-user dashboard endpoint.

use axum::extract::State;
use axum::Json;

use reclaim_core::DashboardView;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<DashboardView>, ApiError> {
    let view = state
        .listings
        .dashboard(identity)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok(Json(view))
}
