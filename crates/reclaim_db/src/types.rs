//! Unified types for all Reclaim database entities.
//!
//! These types are the single source of truth. All interfaces (HTTP
//! handlers, admin tooling, tests) should use these types.

use serde::{Deserialize, Serialize};

// ============================================================================
// User Types
// ============================================================================

/// A registered user (credential store record).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub username: String,
    /// Unique login email
    pub email: String,
    /// Argon2 PHC string; never serialized to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether this user may perform admin actions
    pub is_admin: bool,
    /// Millis since epoch
    pub created_at: i64,
}

// ============================================================================
// Item Types
// ============================================================================

/// Whether a report describes a lost or a found item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemKind {
    Lost,
    Found,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lost => "LOST",
            Self::Found => "FOUND",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOST" => Some(Self::Lost),
            "FOUND" => Some(Self::Found),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Moderation status of an item report.
///
/// Approved, Rejected and Flagged are terminal in-scope; there is no
/// transition table, an admin overwrite always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemStatus {
    Pending,
    Approved,
    Rejected,
    Flagged,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Flagged => "FLAGGED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "FLAGGED" => Some(Self::Flagged),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lost-or-found item report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReport {
    pub id: i64,
    pub owner_user_id: i64,
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub location: String,
    /// Calendar date the item was lost/found, as YYYY-MM-DD
    pub reported_date: String,
    /// Opaque blob-store reference, if an image was uploaded
    pub image_ref: Option<String>,
    pub status: ItemStatus,
    pub created_at: i64,
}

// ============================================================================
// Claim Types
// ============================================================================

/// Status of a claim on a found item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimStatus {
    Pending,
    Verified,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "VERIFIED" => Some(Self::Verified),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A claim filed against a found item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: i64,
    pub claimant_user_id: i64,
    pub item_id: i64,
    pub reason: String,
    pub status: ClaimStatus,
    pub created_at: i64,
}

/// A claim joined with its item's *current* snapshot.
///
/// Claims carry no denormalized copy of the item; this view is built at
/// query time so it always reflects the item's present state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimWithItem {
    pub id: i64,
    pub claimant_user_id: i64,
    pub item_id: i64,
    pub reason: String,
    pub status: ClaimStatus,
    pub created_at: i64,
    pub item_name: String,
    pub item_description: String,
    pub item_location: String,
    pub item_reported_date: String,
    pub item_image_ref: Option<String>,
    pub item_status: ItemStatus,
}

/// A claim as shown on the admin console, with claimant context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAdminRow {
    pub id: i64,
    pub claimant_user_id: i64,
    pub claimant_username: String,
    pub item_id: i64,
    pub item_name: String,
    pub reason: String,
    pub status: ClaimStatus,
    pub created_at: i64,
}

// ============================================================================
// Filter and Aggregate Types
// ============================================================================

/// Filter for listing items.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub kind: Option<ItemKind>,
    pub status: Option<ItemStatus>,
    pub owner_user_id: Option<i64>,
    /// Case-insensitive substring match against name or description
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Item counts per status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatusCounts {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub flagged: u64,
}

/// Claim counts per status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatusCounts {
    pub total: u64,
    pub pending: u64,
    pub verified: u64,
    pub rejected: u64,
}

/// Per-user dashboard totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub lost: u64,
    pub found: u64,
    pub claimed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status_roundtrip() {
        for status in [
            ItemStatus::Pending,
            ItemStatus::Approved,
            ItemStatus::Rejected,
            ItemStatus::Flagged,
        ] {
            let s = status.as_str();
            let parsed = ItemStatus::parse(s).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_claim_status_roundtrip() {
        for status in [ClaimStatus::Pending, ClaimStatus::Verified, ClaimStatus::Rejected] {
            let s = status.as_str();
            let parsed = ClaimStatus::parse(s).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!(ItemKind::parse("found"), Some(ItemKind::Found));
        assert_eq!(ItemKind::parse("Lost"), Some(ItemKind::Lost));
        assert_eq!(ItemKind::parse("stolen"), None);
    }
}
