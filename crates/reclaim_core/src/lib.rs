//! Domain services for Reclaim.
//!
//! Sits between the HTTP boundary and the database layer: input
//! validation, the item/claim lifecycle state machines, account
//! signup/login, and the composed read views. Every store call runs
//! under a bounded timeout so a stalled database surfaces as
//! [`CoreError::Unavailable`] instead of a hung request.

mod accounts;
mod claims;
mod contact;
mod error;
mod items;
mod views;

pub use accounts::AccountService;
pub use claims::ClaimService;
pub use contact::ContactService;
pub use error::{CoreError, Result};
pub use items::{ItemDraft, ItemFilters, ItemService, Page, PageParams};
pub use views::{AdminOverview, AdminStats, DashboardView, ListingService};

use std::future::Future;
use std::time::Duration;

/// Identity resolved by the authorization guard.
///
/// This is the single source of request identity; handlers never trust a
/// client-supplied user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub is_admin: bool,
}

/// Shared service configuration, passed in explicitly (no ambient globals).
#[derive(Debug, Clone, Copy)]
pub struct CoreConfig {
    /// Bound on any single store call
    pub store_timeout: Duration,
    /// Cap on requested page sizes
    pub max_page_size: i64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            max_page_size: 100,
        }
    }
}

/// Run a store call under the configured timeout.
pub(crate) async fn store_call<T, F>(timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = reclaim_db::Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res.map_err(CoreError::from),
        Err(_) => Err(CoreError::Unavailable),
    }
}
