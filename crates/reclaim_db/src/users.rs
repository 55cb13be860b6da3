//! User database operations (credential store)

use crate::error::{DbError, Result};
use crate::types::User;
use crate::ReclaimDb;
use sqlx::Row;

impl ReclaimDb {
    /// Insert a new user. Fails with [`DbError::Conflict`] on duplicate email.
    pub async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO rc_users (username, email, password_hash, is_admin, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .bind(Self::now_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::Conflict(_) => DbError::conflict(format!("email already registered: {email}")),
            other => other,
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Look up a user by login email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM rc_users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row))),
            None => Ok(None),
        }
    }

    /// Look up a user by id.
    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM rc_users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row))),
            None => Ok(None),
        }
    }

    /// Flip the admin flag on an existing user.
    ///
    /// The admin guard re-reads this row on every admin request, so a
    /// revocation here takes effect even for tokens issued earlier.
    pub async fn set_user_admin(&self, id: i64, is_admin: bool) -> Result<()> {
        let result = sqlx::query("UPDATE rc_users SET is_admin = ? WHERE id = ?")
            .bind(is_admin)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(format!("user {id}")));
        }
        Ok(())
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
        User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            is_admin: row.get("is_admin"),
            created_at: row.get("created_at"),
        }
    }
}
