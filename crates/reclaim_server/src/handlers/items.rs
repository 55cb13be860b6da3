//! Item reporting and listing endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use reclaim_core::{CoreError, ItemDraft, ItemFilters, Page, PageParams};
use reclaim_db::{ItemKind, ItemReport};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub reported_date: String,
    pub image_ref: Option<String>,
}

/// Query parameters shared by the public feed and the owner listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub kind: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    fn filters(&self) -> Result<ItemFilters, CoreError> {
        let kind = match &self.kind {
            Some(s) => Some(
                ItemKind::parse(s).ok_or_else(|| CoreError::invalid_field("kind"))?,
            ),
            None => None,
        };
        Ok(ItemFilters {
            kind,
            search: self.search.clone(),
        })
    }

    fn page_params(&self) -> PageParams {
        let defaults = PageParams::default();
        PageParams {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.limit.unwrap_or(defaults.page_size),
        }
    }
}

pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemReport>), ApiError> {
    let kind = ItemKind::parse(&req.kind)
        .ok_or_else(|| state.api_err(CoreError::invalid_field("kind")))?;

    let draft = ItemDraft {
        kind,
        name: req.name,
        description: req.description,
        location: req.location,
        reported_date: req.reported_date,
        image_ref: req.image_ref,
    };

    let item = state
        .items
        .create(identity, draft)
        .await
        .map_err(|e| state.api_err(e))?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Public feed: approved items only.
pub async fn public_feed(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<ItemReport>>, ApiError> {
    let filters = query.filters().map_err(|e| state.api_err(e))?;
    let page = state
        .items
        .list_approved(&filters, query.page_params())
        .await
        .map_err(|e| state.api_err(e))?;

    Ok(Json(page))
}

/// Owner listing: all of the requester's reports, any status.
pub async fn my_items(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<ItemReport>>, ApiError> {
    let filters = query.filters().map_err(|e| state.api_err(e))?;
    let page = state
        .items
        .list_by_owner(identity, &filters, query.page_params())
        .await
        .map_err(|e| state.api_err(e))?;

    Ok(Json(page))
}
