//! Unified database layer for Reclaim.
//!
//! This crate is the single source of truth for all database operations.
//! Every interface (HTTP handlers, admin tooling, tests) goes through
//! [`ReclaimDb`]; no other crate issues raw SQL.
//!
//! # Usage
//!
//! ```rust,ignore
//! use reclaim_db::{ReclaimDb, Result};
//!
//! let db = ReclaimDb::open("~/.reclaim/reclaim.sqlite3").await?;
//!
//! let user = db.find_user_by_email("ada@example.com").await?;
//! let page = db.list_items(&ItemQuery::default()).await?;
//! ```

mod error;
mod schema;
mod types;

// Query implementations organized by domain
mod claims;
mod contact;
mod items;
mod users;

pub use error::{DbError, Result};
pub use types::*;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Unified database handle for all Reclaim operations.
#[derive(Clone)]
pub struct ReclaimDb {
    pool: SqlitePool,
}

impl ReclaimDb {
    /// Open or create a database at the given path.
    ///
    /// Creates all tables if they don't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        info!(path = %path.display(), "Database opened");

        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        Ok(db)
    }

    /// Get the underlying connection pool (escape hatch for complex queries).
    ///
    /// Prefer using the typed methods instead.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

// Timestamp utilities
impl ReclaimDb {
    /// Current time as milliseconds since Unix epoch.
    pub fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_database() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("test.db");

        let db = ReclaimDb::open(&db_path).await.unwrap();
        assert!(db_path.exists());

        db.close().await;
    }

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = ReclaimDb::open_in_memory().await.unwrap();
        db.close().await;
    }
}
