//! Composed read views: public feed, per-user dashboard, admin console.
//!
//! All counts are computed at request time; nothing aggregate is
//! persisted.

use serde::Serialize;

use reclaim_db::{
    ClaimAdminRow, ClaimWithItem, ItemKind, ItemQuery, ItemReport, OwnerSummary, ReclaimDb,
};

use crate::error::Result;
use crate::{store_call, CoreConfig, Identity};

/// A user's dashboard: own reports, own claims, summary totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub items: Vec<ItemReport>,
    pub claims: Vec<ClaimWithItem>,
    pub summary: OwnerSummary,
}

/// Headline numbers for the admin console.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub pending_items: u64,
    pub verified_claims: u64,
    pub flagged_items: u64,
}

/// The admin console: unfiltered items of each kind, all claims, stats.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub lost_items: Vec<ItemReport>,
    pub found_items: Vec<ItemReport>,
    pub claims: Vec<ClaimAdminRow>,
    pub stats: AdminStats,
}

/// Read-only aggregation over the item and claim stores.
#[derive(Clone)]
pub struct ListingService {
    db: ReclaimDb,
    cfg: CoreConfig,
}

impl ListingService {
    pub fn new(db: ReclaimDb, cfg: CoreConfig) -> Self {
        Self { db, cfg }
    }

    /// Everything one user sees on their dashboard.
    pub async fn dashboard(&self, user: Identity) -> Result<DashboardView> {
        let query = ItemQuery {
            owner_user_id: Some(user.user_id),
            ..Default::default()
        };
        let items = store_call(self.cfg.store_timeout, self.db.list_items(&query)).await?;
        let claims = store_call(
            self.cfg.store_timeout,
            self.db.list_claims_by_claimant(user.user_id, None),
        )
        .await?;
        let summary = store_call(self.cfg.store_timeout, self.db.owner_summary(user.user_id))
            .await?;

        Ok(DashboardView {
            items,
            claims,
            summary,
        })
    }

    /// Unfiltered items of one kind, for the admin console.
    pub async fn items_of_kind(&self, kind: ItemKind) -> Result<Vec<ItemReport>> {
        let query = ItemQuery {
            kind: Some(kind),
            ..Default::default()
        };
        store_call(self.cfg.store_timeout, self.db.list_items(&query)).await
    }

    /// The full admin console view.
    pub async fn admin_overview(&self) -> Result<AdminOverview> {
        let lost_items = self.items_of_kind(ItemKind::Lost).await?;
        let found_items = self.items_of_kind(ItemKind::Found).await?;
        let claims = store_call(self.cfg.store_timeout, self.db.list_all_claims()).await?;
        let item_counts =
            store_call(self.cfg.store_timeout, self.db.item_status_counts()).await?;
        let claim_counts =
            store_call(self.cfg.store_timeout, self.db.claim_status_counts()).await?;

        Ok(AdminOverview {
            lost_items,
            found_items,
            claims,
            stats: AdminStats {
                pending_items: item_counts.pending,
                verified_claims: claim_counts.verified,
                flagged_items: item_counts.flagged,
            },
        })
    }

    /// All claims with claimant/item context, for the admin console.
    pub async fn all_claims(&self) -> Result<Vec<ClaimAdminRow>> {
        store_call(self.cfg.store_timeout, self.db.list_all_claims()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_db::{ClaimStatus, ItemStatus};

    #[tokio::test]
    async fn dashboard_and_admin_overview_compose_current_state() {
        let db = ReclaimDb::open_in_memory().await.unwrap();
        let owner = db
            .insert_user("owner", "owner@example.com", "hash", false)
            .await
            .unwrap();
        let claimant = db
            .insert_user("claimant", "claimant@example.com", "hash", false)
            .await
            .unwrap();

        let lost = db
            .insert_item(owner, ItemKind::Lost, "Keys", "desc", "hall", "2024-03-01", None)
            .await
            .unwrap();
        let found = db
            .insert_item(owner, ItemKind::Found, "Backpack", "desc", "gym", "2024-03-02", None)
            .await
            .unwrap();
        db.set_item_status(lost, ItemStatus::Flagged).await.unwrap();
        db.set_item_status(found, ItemStatus::Approved).await.unwrap();

        let claim = db.insert_claim(claimant, found, "mine").await.unwrap();
        db.set_claim_status(claim, ClaimStatus::Verified).await.unwrap();

        let svc = ListingService::new(db, CoreConfig::default());

        let dash = svc
            .dashboard(Identity {
                user_id: owner,
                is_admin: false,
            })
            .await
            .unwrap();
        assert_eq!(dash.items.len(), 2);
        assert!(dash.claims.is_empty());
        assert_eq!(dash.summary.lost, 1);
        assert_eq!(dash.summary.found, 1);

        let overview = svc.admin_overview().await.unwrap();
        assert_eq!(overview.lost_items.len(), 1);
        assert_eq!(overview.found_items.len(), 1);
        assert_eq!(overview.claims.len(), 1);
        assert_eq!(overview.claims[0].claimant_username, "claimant");
        assert_eq!(overview.stats.pending_items, 0);
        assert_eq!(overview.stats.verified_claims, 1);
        assert_eq!(overview.stats.flagged_items, 1);
    }
}
