//! Account signup, login, and authoritative admin lookup.

use tracing::{info, warn};

use reclaim_auth::{hash_password, verify_password, TokenSigner};
use reclaim_db::{ReclaimDb, User};

use crate::error::{CoreError, Result};
use crate::{store_call, CoreConfig};

/// Signup, login, and the credential-store lookups the guards rely on.
#[derive(Clone)]
pub struct AccountService {
    db: ReclaimDb,
    signer: TokenSigner,
    cfg: CoreConfig,
}

impl AccountService {
    pub fn new(db: ReclaimDb, signer: TokenSigner, cfg: CoreConfig) -> Self {
        Self { db, signer, cfg }
    }

    /// Register a new user. Duplicate emails are a Conflict.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let mut bad_fields = Vec::new();
        if username.trim().is_empty() {
            bad_fields.push("username".to_string());
        }
        if email.trim().is_empty() || !email.contains('@') {
            bad_fields.push("email".to_string());
        }
        if password.is_empty() {
            bad_fields.push("password".to_string());
        }
        if !bad_fields.is_empty() {
            return Err(CoreError::Validation(bad_fields));
        }

        let hash =
            hash_password(password).map_err(|e| CoreError::Internal(e.to_string()))?;

        let id = store_call(
            self.cfg.store_timeout,
            self.db
                .insert_user(username.trim(), email.trim(), &hash, false),
        )
        .await?;

        info!(user_id = id, "User registered");

        self.find_user(id).await
    }

    /// Authenticate and issue a session token.
    ///
    /// Unknown email and wrong password are the same Unauthorized; no
    /// account-probing signal.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User)> {
        let user = store_call(
            self.cfg.store_timeout,
            self.db.find_user_by_email(email.trim()),
        )
        .await?
        .ok_or(CoreError::Unauthorized)?;

        let ok = verify_password(password, &user.password_hash)
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        if !ok {
            warn!(user_id = user.id, "Login rejected: bad password");
            return Err(CoreError::Unauthorized);
        }

        let token = self
            .signer
            .issue(user.id, user.is_admin)
            .map_err(|e| CoreError::Internal(e.to_string()))?;

        info!(user_id = user.id, "Login succeeded");

        Ok((token, user))
    }

    /// Fetch a user by id, NotFound if absent.
    pub async fn find_user(&self, id: i64) -> Result<User> {
        store_call(self.cfg.store_timeout, self.db.find_user_by_id(id))
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("user {id}")))
    }

    /// Authoritative admin check against the credential store.
    ///
    /// The token's admin claim alone is not trusted, so a privilege
    /// revocation takes effect on the next request.
    pub async fn authorize_admin(&self, user_id: i64) -> Result<User> {
        let user = store_call(self.cfg.store_timeout, self.db.find_user_by_id(user_id))
            .await?
            .ok_or(CoreError::Forbidden)?;
        if !user.is_admin {
            return Err(CoreError::Forbidden);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> AccountService {
        let db = ReclaimDb::open_in_memory().await.unwrap();
        let signer = TokenSigner::new("test-secret", 3600);
        AccountService::new(db, signer, CoreConfig::default())
    }

    #[tokio::test]
    async fn signup_then_login_roundtrips_user_id() {
        let svc = service().await;
        let user = svc
            .signup("ada", "ada@example.com", "correct horse")
            .await
            .unwrap();

        let (token, logged_in) = svc.login("ada@example.com", "correct horse").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let claims = TokenSigner::new("test-secret", 3600).verify(&token).unwrap();
        assert_eq!(claims.user_id, user.id);
        assert!(!claims.is_admin);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let svc = service().await;
        svc.signup("ada", "ada@example.com", "pw").await.unwrap();
        let err = svc
            .signup("imposter", "ada@example.com", "pw2")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn signup_validates_fields() {
        let svc = service().await;
        let err = svc.signup(" ", "not-an-email", "").await.unwrap_err();
        match err {
            CoreError::Validation(fields) => {
                assert_eq!(fields, vec!["username", "email", "password"])
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_both_unauthorized() {
        let svc = service().await;
        svc.signup("ada", "ada@example.com", "pw").await.unwrap();

        let err = svc.login("ada@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized));

        let err = svc.login("ghost@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized));
    }

    #[tokio::test]
    async fn admin_check_reads_store_not_token() {
        let db = ReclaimDb::open_in_memory().await.unwrap();
        let signer = TokenSigner::new("s", 3600);
        let svc = AccountService::new(db.clone(), signer, CoreConfig::default());

        let user = svc.signup("ada", "ada@example.com", "pw").await.unwrap();
        assert!(matches!(
            svc.authorize_admin(user.id).await.unwrap_err(),
            CoreError::Forbidden
        ));

        db.set_user_admin(user.id, true).await.unwrap();
        let admin = svc.authorize_admin(user.id).await.unwrap();
        assert!(admin.is_admin);
    }
}
