//! Contact-form submissions.

use tracing::info;

use reclaim_db::ReclaimDb;

use crate::error::{CoreError, Result};
use crate::{store_call, CoreConfig};

/// Accepts contact-form messages; no authentication involved.
#[derive(Clone)]
pub struct ContactService {
    db: ReclaimDb,
    cfg: CoreConfig,
}

impl ContactService {
    pub fn new(db: ReclaimDb, cfg: CoreConfig) -> Self {
        Self { db, cfg }
    }

    /// Store a message. All fields are required.
    pub async fn submit(&self, name: &str, email: &str, message: &str) -> Result<i64> {
        let mut bad_fields = Vec::new();
        if name.trim().is_empty() {
            bad_fields.push("name".to_string());
        }
        if email.trim().is_empty() {
            bad_fields.push("email".to_string());
        }
        if message.trim().is_empty() {
            bad_fields.push("message".to_string());
        }
        if !bad_fields.is_empty() {
            return Err(CoreError::Validation(bad_fields));
        }

        let id = store_call(
            self.cfg.store_timeout,
            self.db
                .insert_contact_message(name.trim(), email.trim(), message.trim()),
        )
        .await?;

        info!(message_id = id, "Contact message stored");

        Ok(id)
    }
}
