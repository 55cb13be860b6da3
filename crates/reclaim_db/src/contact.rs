//! Contact form message storage

use crate::error::Result;
use crate::ReclaimDb;

impl ReclaimDb {
    /// Store a contact-form submission.
    pub async fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO rc_contact_messages (name, email, message, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .bind(Self::now_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
