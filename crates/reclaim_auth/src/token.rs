//! Signed session tokens.
//!
//! Tokens are HS256 JWTs carrying {sub, admin, iat, exp}. Expiry is fixed
//! at issuance (default one hour); there is no refresh path, a new token
//! requires re-authentication.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token verification/issuance errors.
///
/// `Malformed` and `BadSignature` are deliberately distinct from
/// `Expired`: callers treat the first two as a hostile or corrupted
/// credential and the last as a routine re-login.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Not exactly three dot-separated segments, or undecodable claims
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the configured secret
    #[error("invalid token signature")]
    BadSignature,

    /// Structurally valid and correctly signed, but past its expiry
    #[error("token expired")]
    Expired,

    /// Issuance failed (key misconfiguration)
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Identity resolved from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: i64,
    pub is_admin: bool,
}

/// JWT claim set on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    admin: bool,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenSigner {
    /// Create a signer. `ttl_secs` is the lifetime stamped into each token.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a signed token for the given identity.
    pub fn issue(&self, user_id: i64, is_admin: bool) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let claims = WireClaims {
            sub: user_id.to_string(),
            admin: is_admin,
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a token and extract the identity it encodes.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        // Structural check first: anything that is not three segments is
        // malformed, regardless of what the decoder would say.
        if token.split('.').count() != 3 {
            return Err(TokenError::Malformed);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<WireClaims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;

        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Malformed)?;

        Ok(TokenClaims {
            user_id,
            is_admin: data.claims.admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", 3600)
    }

    #[test]
    fn issue_then_verify_roundtrips_identity() {
        let s = signer();
        let token = s.issue(42, true).unwrap();
        let claims = s.verify(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert!(claims.is_admin);
    }

    #[test]
    fn token_has_three_segments() {
        let token = signer().issue(1, false).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn malformed_token_is_rejected() {
        let s = signer();
        assert_eq!(s.verify("nonsense"), Err(TokenError::Malformed));
        assert_eq!(s.verify("a.b"), Err(TokenError::Malformed));
        assert_eq!(s.verify("a.b.c.d"), Err(TokenError::Malformed));
    }

    #[test]
    fn wrong_secret_is_bad_signature() {
        let token = signer().issue(7, false).unwrap();
        let other = TokenSigner::new("different-secret", 3600);
        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn expired_token_is_expired_even_with_valid_signature() {
        // Stamped already past expiry
        let s = TokenSigner::new("test-secret", -10);
        let token = s.issue(7, false).unwrap();
        assert_eq!(s.verify(&token), Err(TokenError::Expired));
    }
}
