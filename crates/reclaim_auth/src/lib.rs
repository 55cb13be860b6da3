//! Authentication primitives for Reclaim.
//!
//! Provides signed session tokens (HS256) and argon2 password hashing.
//! The signing secret is process configuration; nothing in this crate
//! reads the environment or holds global state.

mod password;
mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{TokenClaims, TokenError, TokenSigner};
