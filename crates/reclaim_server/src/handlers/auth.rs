//! Signup, login, and the current-user endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

use super::UserSummary;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    let user = state
        .accounts
        .signup(&req.username, &req.email, &req.password)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok((StatusCode::CREATED, Json(UserSummary::from(&user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (token, user) = state
        .accounts
        .login(&req.email, &req.password)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok(Json(LoginResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<UserSummary>, ApiError> {
    let user = state
        .accounts
        .find_user(identity.user_id)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok(Json(UserSummary::from(&user)))
}
