//! Request guards.
//!
//! [`AuthUser`] is the authorization guard: it resolves the bearer token
//! into an [`Identity`], which is the only identity handlers may use.
//! [`AdminUser`] composes on top of it and re-checks the admin flag
//! against the credential store, so a revoked admin loses access even
//! while holding a token that still claims the flag.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use reclaim_core::Identity;
use reclaim_db::User;

use crate::error::ApiError;
use crate::AppState;

/// Identity of an authenticated requester.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(ApiError::unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(ApiError::unauthorized)?;

        match state.signer.verify(token) {
            Ok(claims) => Ok(AuthUser(Identity {
                user_id: claims.user_id,
                is_admin: claims.is_admin,
            })),
            Err(e) => Err(ApiError::forbidden_discard(e.to_string())),
        }
    }
}

/// An authenticated requester whose admin flag was confirmed against the
/// credential store on this request.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub identity: Identity,
    #[allow(dead_code)]
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;

        let user = state
            .accounts
            .authorize_admin(identity.user_id)
            .await
            .map_err(|e| state.api_err(e))?;

        Ok(AdminUser {
            identity: Identity {
                user_id: user.id,
                is_admin: true,
            },
            user,
        })
    }
}
