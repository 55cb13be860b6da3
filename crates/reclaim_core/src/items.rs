//! Item report lifecycle.
//!
//! State machine per report: Pending on creation, then an admin overwrite
//! to Approved, Rejected or Flagged. The overwrite is deliberately
//! unconditional (no allowed-transition table); repeating a transition is
//! a no-op success.

use serde::Serialize;
use tracing::info;

use reclaim_db::{ItemKind, ItemQuery, ItemReport, ItemStatus, ReclaimDb};

use crate::error::{CoreError, Result};
use crate::{store_call, CoreConfig, Identity};

/// Fields supplied when reporting an item.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub location: String,
    /// YYYY-MM-DD
    pub reported_date: String,
    /// Opaque blob-store reference; never interpreted here
    pub image_ref: Option<String>,
}

/// Listing filters shared by the public feed and owner views.
#[derive(Debug, Clone, Default)]
pub struct ItemFilters {
    pub kind: Option<ItemKind>,
    pub search: Option<String>,
}

/// Offset pagination request. Both values are 1-based/positive.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

/// One page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    #[serde(rename = "limit")]
    pub page_size: i64,
    pub total: u64,
    pub total_pages: u64,
}

/// Owns item creation and the item status state machine.
#[derive(Clone)]
pub struct ItemService {
    db: ReclaimDb,
    cfg: CoreConfig,
}

impl ItemService {
    pub fn new(db: ReclaimDb, cfg: CoreConfig) -> Self {
        Self { db, cfg }
    }

    /// Create a report with status Pending.
    ///
    /// All required fields are validated before the store is touched;
    /// every offending field is reported in one ValidationError.
    pub async fn create(&self, owner: Identity, draft: ItemDraft) -> Result<ItemReport> {
        let mut bad_fields = Vec::new();
        if draft.name.trim().is_empty() {
            bad_fields.push("name".to_string());
        }
        if draft.description.trim().is_empty() {
            bad_fields.push("description".to_string());
        }
        if draft.location.trim().is_empty() {
            bad_fields.push("location".to_string());
        }
        if draft.reported_date.trim().is_empty()
            || chrono::NaiveDate::parse_from_str(&draft.reported_date, "%Y-%m-%d").is_err()
        {
            bad_fields.push("reportedDate".to_string());
        }
        if !bad_fields.is_empty() {
            return Err(CoreError::Validation(bad_fields));
        }

        let id = store_call(
            self.cfg.store_timeout,
            self.db.insert_item(
                owner.user_id,
                draft.kind,
                draft.name.trim(),
                draft.description.trim(),
                draft.location.trim(),
                draft.reported_date.trim(),
                draft.image_ref.as_deref(),
            ),
        )
        .await?;

        info!(item_id = id, kind = %draft.kind, owner = owner.user_id, "Item reported");

        self.fetch(id).await
    }

    /// Overwrite an item's status (admin action).
    ///
    /// Unknown ids are a Conflict: the caller asked to move an entity
    /// that does not exist.
    pub async fn transition(
        &self,
        item_id: i64,
        new_status: ItemStatus,
        actor: Identity,
    ) -> Result<ItemReport> {
        if !actor.is_admin {
            return Err(CoreError::Forbidden);
        }

        let updated = store_call(
            self.cfg.store_timeout,
            self.db.set_item_status(item_id, new_status),
        )
        .await?;
        if !updated {
            return Err(CoreError::Conflict(format!("unknown item {item_id}")));
        }

        info!(item_id, status = %new_status, actor = actor.user_id, "Item status set");

        self.fetch(item_id).await
    }

    /// Public listing surface: Approved items only.
    pub async fn list_approved(
        &self,
        filters: &ItemFilters,
        params: PageParams,
    ) -> Result<Page<ItemReport>> {
        self.list_page(filters, params, Some(ItemStatus::Approved), None)
            .await
    }

    /// Owner listing: all of one user's reports, any status.
    pub async fn list_by_owner(
        &self,
        owner: Identity,
        filters: &ItemFilters,
        params: PageParams,
    ) -> Result<Page<ItemReport>> {
        self.list_page(filters, params, None, Some(owner.user_id))
            .await
    }

    async fn list_page(
        &self,
        filters: &ItemFilters,
        params: PageParams,
        status: Option<ItemStatus>,
        owner_user_id: Option<i64>,
    ) -> Result<Page<ItemReport>> {
        if params.page < 1 {
            return Err(CoreError::invalid_field("page"));
        }
        if params.page_size < 1 {
            return Err(CoreError::invalid_field("limit"));
        }
        let page_size = params.page_size.min(self.cfg.max_page_size);
        let offset = (params.page - 1) * page_size;

        let query = ItemQuery {
            kind: filters.kind,
            status,
            owner_user_id,
            search: filters.search.clone(),
            limit: Some(page_size),
            offset: Some(offset),
        };

        let items = store_call(self.cfg.store_timeout, self.db.list_items(&query)).await?;
        let total = store_call(self.cfg.store_timeout, self.db.count_items(&query)).await?;
        let total_pages = total.div_ceil(page_size as u64);

        Ok(Page {
            items,
            page: params.page,
            page_size,
            total,
            total_pages,
        })
    }

    async fn fetch(&self, id: i64) -> Result<ItemReport> {
        store_call(self.cfg.store_timeout, self.db.get_item(id))
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("item {id}")))
    }
}
