//! Item report database operations

use crate::error::{DbError, Result};
use crate::types::*;
use crate::ReclaimDb;
use sqlx::{QueryBuilder, Row, Sqlite};

impl ReclaimDb {
    /// Insert a new item report with status Pending.
    pub async fn insert_item(
        &self,
        owner_user_id: i64,
        kind: ItemKind,
        name: &str,
        description: &str,
        location: &str,
        reported_date: &str,
        image_ref: Option<&str>,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO rc_items
                (owner_user_id, kind, name, description, location, reported_date, image_ref, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 'PENDING', ?)
            "#,
        )
        .bind(owner_user_id)
        .bind(kind.as_str())
        .bind(name)
        .bind(description)
        .bind(location)
        .bind(reported_date)
        .bind(image_ref)
        .bind(Self::now_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get an item by id.
    pub async fn get_item(&self, id: i64) -> Result<Option<ItemReport>> {
        let row = sqlx::query("SELECT * FROM rc_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_item(&row)?)),
            None => Ok(None),
        }
    }

    /// Overwrite an item's status. One atomic UPDATE; last write wins.
    ///
    /// Returns false when no row matched the id.
    pub async fn set_item_status(&self, id: i64, status: ItemStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE rc_items SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List items matching a filter, newest first.
    pub async fn list_items(&self, filter: &ItemQuery) -> Result<Vec<ItemReport>> {
        let mut qb = Self::item_query_builder("SELECT * FROM rc_items WHERE 1=1", filter);

        qb.push(" ORDER BY id DESC");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
            if let Some(offset) = filter.offset {
                qb.push(" OFFSET ").push_bind(offset);
            }
        }

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_item).collect()
    }

    /// Count items matching a filter (ignores limit/offset).
    pub async fn count_items(&self, filter: &ItemQuery) -> Result<u64> {
        let mut qb =
            Self::item_query_builder("SELECT COUNT(*) AS n FROM rc_items WHERE 1=1", filter);

        let row = qb.build().fetch_one(&self.pool).await?;
        Ok(row.get::<i64, _>("n") as u64)
    }

    /// Aggregate item counts per status, computed at request time.
    pub async fn item_status_counts(&self) -> Result<ItemStatusCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                SUM(CASE WHEN status = 'PENDING' THEN 1 ELSE 0 END) as pending,
                SUM(CASE WHEN status = 'APPROVED' THEN 1 ELSE 0 END) as approved,
                SUM(CASE WHEN status = 'REJECTED' THEN 1 ELSE 0 END) as rejected,
                SUM(CASE WHEN status = 'FLAGGED' THEN 1 ELSE 0 END) as flagged
            FROM rc_items
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ItemStatusCounts {
            total: row.get::<i64, _>("total") as u64,
            pending: row.get::<Option<i64>, _>("pending").unwrap_or(0) as u64,
            approved: row.get::<Option<i64>, _>("approved").unwrap_or(0) as u64,
            rejected: row.get::<Option<i64>, _>("rejected").unwrap_or(0) as u64,
            flagged: row.get::<Option<i64>, _>("flagged").unwrap_or(0) as u64,
        })
    }

    /// Per-owner dashboard totals: own lost items, own found items, own claims.
    pub async fn owner_summary(&self, owner_user_id: i64) -> Result<OwnerSummary> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM rc_items WHERE owner_user_id = ?1 AND kind = 'LOST') as lost,
                (SELECT COUNT(*) FROM rc_items WHERE owner_user_id = ?1 AND kind = 'FOUND') as found,
                (SELECT COUNT(*) FROM rc_claims WHERE claimant_user_id = ?1) as claimed
            "#,
        )
        .bind(owner_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(OwnerSummary {
            lost: row.get::<i64, _>("lost") as u64,
            found: row.get::<i64, _>("found") as u64,
            claimed: row.get::<i64, _>("claimed") as u64,
        })
    }

    fn item_query_builder<'a>(base: &str, filter: &'a ItemQuery) -> QueryBuilder<'a, Sqlite> {
        let mut qb = QueryBuilder::new(base);

        if let Some(kind) = filter.kind {
            qb.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(owner) = filter.owner_user_id {
            qb.push(" AND owner_user_id = ").push_bind(owner);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            qb.push(" AND (LOWER(name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(description) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb
    }

    pub(crate) fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<ItemReport> {
        let kind_str: String = row.get("kind");
        let kind = ItemKind::parse(&kind_str)
            .ok_or_else(|| DbError::invalid_state(format!("Unknown item kind: {kind_str}")))?;

        let status_str: String = row.get("status");
        let status = ItemStatus::parse(&status_str)
            .ok_or_else(|| DbError::invalid_state(format!("Unknown item status: {status_str}")))?;

        Ok(ItemReport {
            id: row.get("id"),
            owner_user_id: row.get("owner_user_id"),
            kind,
            name: row.get("name"),
            description: row.get("description"),
            location: row.get("location"),
            reported_date: row.get("reported_date"),
            image_ref: row.get("image_ref"),
            status,
            created_at: row.get("created_at"),
        })
    }
}
