//! Claim lifecycle.
//!
//! Claims are filed against found items only. Status moves Pending →
//! Verified/Rejected through the same unconditional admin overwrite the
//! item state machine uses.

use tracing::info;

use reclaim_db::{Claim, ClaimStatus, ClaimWithItem, ReclaimDb};

use crate::error::{CoreError, Result};
use crate::{store_call, CoreConfig, Identity};

/// Owns claim creation and the claim status state machine.
#[derive(Clone)]
pub struct ClaimService {
    db: ReclaimDb,
    cfg: CoreConfig,
}

impl ClaimService {
    pub fn new(db: ReclaimDb, cfg: CoreConfig) -> Self {
        Self { db, cfg }
    }

    /// File a claim. The item must exist and be Found-kind; it does not
    /// have to be Approved yet.
    pub async fn create(&self, claimant: Identity, item_id: i64, reason: &str) -> Result<Claim> {
        if reason.trim().is_empty() {
            return Err(CoreError::invalid_field("reason"));
        }

        let id = store_call(
            self.cfg.store_timeout,
            self.db.insert_claim(claimant.user_id, item_id, reason.trim()),
        )
        .await?;

        info!(claim_id = id, item_id, claimant = claimant.user_id, "Claim filed");

        store_call(self.cfg.store_timeout, self.db.get_claim(id))
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("claim {id}")))
    }

    /// Overwrite a claim's status (admin action). Unknown id → Conflict.
    pub async fn transition(
        &self,
        claim_id: i64,
        new_status: ClaimStatus,
        actor: Identity,
    ) -> Result<Claim> {
        if !actor.is_admin {
            return Err(CoreError::Forbidden);
        }

        let updated = store_call(
            self.cfg.store_timeout,
            self.db.set_claim_status(claim_id, new_status),
        )
        .await?;
        if !updated {
            return Err(CoreError::Conflict(format!("unknown claim {claim_id}")));
        }

        info!(claim_id, status = %new_status, actor = actor.user_id, "Claim status set");

        store_call(self.cfg.store_timeout, self.db.get_claim(claim_id))
            .await?
            .ok_or_else(|| CoreError::Conflict(format!("unknown claim {claim_id}")))
    }

    /// One user's claims, each joined with its item's current snapshot.
    pub async fn list_by_claimant(
        &self,
        claimant: Identity,
        status: Option<ClaimStatus>,
    ) -> Result<Vec<ClaimWithItem>> {
        store_call(
            self.cfg.store_timeout,
            self.db.list_claims_by_claimant(claimant.user_id, status),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_db::{ItemKind, ItemStatus};

    async fn setup() -> (ClaimService, ReclaimDb, Identity, Identity, i64) {
        let db = ReclaimDb::open_in_memory().await.unwrap();
        let owner = db
            .insert_user("owner", "owner@example.com", "hash", false)
            .await
            .unwrap();
        let claimant_id = db
            .insert_user("claimant", "claimant@example.com", "hash", false)
            .await
            .unwrap();
        let admin_id = db
            .insert_user("admin", "admin@example.com", "hash", true)
            .await
            .unwrap();
        let item_id = db
            .insert_item(owner, ItemKind::Found, "Blue Backpack", "desc", "gym", "2024-03-01", None)
            .await
            .unwrap();

        let claimant = Identity {
            user_id: claimant_id,
            is_admin: false,
        };
        let admin = Identity {
            user_id: admin_id,
            is_admin: true,
        };
        (
            ClaimService::new(db.clone(), CoreConfig::default()),
            db,
            claimant,
            admin,
            item_id,
        )
    }

    #[tokio::test]
    async fn empty_reason_is_validation_error() {
        let (svc, _db, claimant, _, item_id) = setup().await;
        let err = svc.create(claimant, item_id, "   ").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(f) if f == vec!["reason"]));
    }

    #[tokio::test]
    async fn claim_against_pending_found_item_is_allowed() {
        let (svc, _db, claimant, _, item_id) = setup().await;
        let claim = svc.create(claimant, item_id, "It's mine").await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.claimant_user_id, claimant.user_id);
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let (svc, _db, claimant, _, _) = setup().await;
        let err = svc.create(claimant, 9999, "mine").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn verify_flow_reflects_current_item_state() {
        let (svc, db, claimant, admin, item_id) = setup().await;
        let claim = svc.create(claimant, item_id, "It's mine").await.unwrap();

        db.set_item_status(item_id, ItemStatus::Approved).await.unwrap();
        let claim = svc
            .transition(claim.id, ClaimStatus::Verified, admin)
            .await
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::Verified);

        let listed = svc.list_by_claimant(claimant, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, ClaimStatus::Verified);
        assert_eq!(listed[0].item_status, ItemStatus::Approved);
    }

    #[tokio::test]
    async fn non_admin_transition_is_forbidden_and_leaves_status() {
        let (svc, _db, claimant, _, item_id) = setup().await;
        let claim = svc.create(claimant, item_id, "mine").await.unwrap();

        let err = svc
            .transition(claim.id, ClaimStatus::Verified, claimant)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden));

        let listed = svc.list_by_claimant(claimant, None).await.unwrap();
        assert_eq!(listed[0].status, ClaimStatus::Pending);
    }
}
