//! Claim database operations

use crate::error::{DbError, Result};
use crate::types::*;
use crate::ReclaimDb;
use sqlx::Row;

impl ReclaimDb {
    /// Insert a claim against a found item (atomic validate-then-insert).
    ///
    /// The existence/kind check and the insert run in one transaction so a
    /// concurrently removed item cannot leave a dangling claim. Fails with
    /// [`DbError::NotFound`] if the item is missing or not Found-kind. The
    /// item does not have to be Approved.
    pub async fn insert_claim(
        &self,
        claimant_user_id: i64,
        item_id: i64,
        reason: &str,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT kind FROM rc_items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?;

        let kind_str: String = match row {
            Some(row) => row.get("kind"),
            None => {
                tx.rollback().await?;
                return Err(DbError::not_found(format!("item {item_id}")));
            }
        };

        if ItemKind::parse(&kind_str) != Some(ItemKind::Found) {
            tx.rollback().await?;
            return Err(DbError::not_found(format!(
                "item {item_id} is not a found item"
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO rc_claims (claimant_user_id, item_id, reason, status, created_at)
            VALUES (?, ?, ?, 'PENDING', ?)
            "#,
        )
        .bind(claimant_user_id)
        .bind(item_id)
        .bind(reason)
        .bind(Self::now_millis())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.last_insert_rowid())
    }

    /// Get a claim by id.
    pub async fn get_claim(&self, id: i64) -> Result<Option<Claim>> {
        let row = sqlx::query("SELECT * FROM rc_claims WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_claim(&row)?)),
            None => Ok(None),
        }
    }

    /// Overwrite a claim's status. One atomic UPDATE; last write wins.
    ///
    /// Returns false when no row matched the id.
    pub async fn set_claim_status(&self, id: i64, status: ClaimStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE rc_claims SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List one user's claims joined with each item's current snapshot.
    ///
    /// The join runs at query time, so `item_status` always reflects the
    /// item's present state rather than a copy taken at claim time.
    pub async fn list_claims_by_claimant(
        &self,
        claimant_user_id: i64,
        status: Option<ClaimStatus>,
    ) -> Result<Vec<ClaimWithItem>> {
        let mut sql = String::from(
            r#"
            SELECT c.id, c.claimant_user_id, c.item_id, c.reason, c.status, c.created_at,
                   i.name AS item_name, i.description AS item_description,
                   i.location AS item_location, i.reported_date AS item_reported_date,
                   i.image_ref AS item_image_ref, i.status AS item_status
            FROM rc_claims c
            JOIN rc_items i ON i.id = c.item_id
            WHERE c.claimant_user_id = ?
            "#,
        );
        if status.is_some() {
            sql.push_str(" AND c.status = ?");
        }
        sql.push_str(" ORDER BY c.id DESC");

        let mut query = sqlx::query(&sql).bind(claimant_user_id);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_claim_with_item).collect()
    }

    /// List every claim with claimant and item context (admin console).
    pub async fn list_all_claims(&self) -> Result<Vec<ClaimAdminRow>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.claimant_user_id, c.item_id, c.reason, c.status, c.created_at,
                   u.username AS claimant_username, i.name AS item_name
            FROM rc_claims c
            JOIN rc_users u ON u.id = c.claimant_user_id
            JOIN rc_items i ON i.id = c.item_id
            ORDER BY c.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let status_str: String = row.get("status");
                let status = ClaimStatus::parse(&status_str).ok_or_else(|| {
                    DbError::invalid_state(format!("Unknown claim status: {status_str}"))
                })?;

                Ok(ClaimAdminRow {
                    id: row.get("id"),
                    claimant_user_id: row.get("claimant_user_id"),
                    claimant_username: row.get("claimant_username"),
                    item_id: row.get("item_id"),
                    item_name: row.get("item_name"),
                    reason: row.get("reason"),
                    status,
                    created_at: row.get("created_at"),
                })
            })
            .collect()
    }

    /// Aggregate claim counts per status, computed at request time.
    pub async fn claim_status_counts(&self) -> Result<ClaimStatusCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                SUM(CASE WHEN status = 'PENDING' THEN 1 ELSE 0 END) as pending,
                SUM(CASE WHEN status = 'VERIFIED' THEN 1 ELSE 0 END) as verified,
                SUM(CASE WHEN status = 'REJECTED' THEN 1 ELSE 0 END) as rejected
            FROM rc_claims
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ClaimStatusCounts {
            total: row.get::<i64, _>("total") as u64,
            pending: row.get::<Option<i64>, _>("pending").unwrap_or(0) as u64,
            verified: row.get::<Option<i64>, _>("verified").unwrap_or(0) as u64,
            rejected: row.get::<Option<i64>, _>("rejected").unwrap_or(0) as u64,
        })
    }

    fn row_to_claim(row: &sqlx::sqlite::SqliteRow) -> Result<Claim> {
        let status_str: String = row.get("status");
        let status = ClaimStatus::parse(&status_str)
            .ok_or_else(|| DbError::invalid_state(format!("Unknown claim status: {status_str}")))?;

        Ok(Claim {
            id: row.get("id"),
            claimant_user_id: row.get("claimant_user_id"),
            item_id: row.get("item_id"),
            reason: row.get("reason"),
            status,
            created_at: row.get("created_at"),
        })
    }

    fn row_to_claim_with_item(row: &sqlx::sqlite::SqliteRow) -> Result<ClaimWithItem> {
        let status_str: String = row.get("status");
        let status = ClaimStatus::parse(&status_str)
            .ok_or_else(|| DbError::invalid_state(format!("Unknown claim status: {status_str}")))?;

        let item_status_str: String = row.get("item_status");
        let item_status = ItemStatus::parse(&item_status_str).ok_or_else(|| {
            DbError::invalid_state(format!("Unknown item status: {item_status_str}"))
        })?;

        Ok(ClaimWithItem {
            id: row.get("id"),
            claimant_user_id: row.get("claimant_user_id"),
            item_id: row.get("item_id"),
            reason: row.get("reason"),
            status,
            created_at: row.get("created_at"),
            item_name: row.get("item_name"),
            item_description: row.get("item_description"),
            item_location: row.get("item_location"),
            item_reported_date: row.get("item_reported_date"),
            item_image_ref: row.get("item_image_ref"),
            item_status,
        })
    }
}
