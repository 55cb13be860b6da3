//! HTTP boundary for Reclaim.
//!
//! Builds the axum router over the domain services. Authentication is an
//! extractor ([`extract::AuthUser`]); admin routes add a second extractor
//! that re-checks the admin flag against the credential store.

pub mod blob;
pub mod config;
pub mod error;
pub mod extract;
mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use reclaim_auth::TokenSigner;
use reclaim_core::{
    AccountService, ClaimService, ContactService, CoreError, ItemService, ListingService,
};

use crate::blob::BlobStore;
use crate::error::ApiError;

/// Shared state for all handlers; constructed once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub items: ItemService,
    pub claims: ClaimService,
    pub listings: ListingService,
    pub contact: ContactService,
    pub signer: TokenSigner,
    pub blobs: Arc<dyn BlobStore>,
    pub dev_errors: bool,
}

impl AppState {
    /// Classify a service error for the wire.
    pub(crate) fn api_err(&self, err: CoreError) -> ApiError {
        ApiError::from_core(err, self.dev_errors)
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/signup", post(handlers::auth::signup))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/me", get(handlers::auth::me))
        .route(
            "/api/items",
            get(handlers::items::public_feed).post(handlers::items::create_item),
        )
        .route("/api/my/items", get(handlers::items::my_items))
        .route("/api/claims", post(handlers::claims::create_claim))
        .route("/api/my/claims", get(handlers::claims::my_claims))
        .route("/api/dashboard", get(handlers::views::dashboard))
        .route("/api/uploads", post(handlers::uploads::upload))
        .route("/api/contact", post(handlers::contact::submit))
        .route("/api/admin/overview", get(handlers::admin::overview))
        .route("/api/admin/items/lost", get(handlers::admin::lost_items))
        .route("/api/admin/items/found", get(handlers::admin::found_items))
        .route("/api/admin/claims", get(handlers::admin::all_claims))
        .route(
            "/api/admin/items/:id/status",
            post(handlers::admin::set_item_status),
        )
        .route(
            "/api/admin/claims/:id/status",
            post(handlers::admin::set_claim_status),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
