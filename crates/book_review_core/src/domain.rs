//! crates/book_review_core/src/domain.rs
//!
//! Defines the core data structures shared by the controllers.
//! Wire-facing records derive serde so the gateway can decode them directly.

use serde::{Deserialize, Serialize};

/// Number of records the remote collection returns per page.
pub const PAGE_SIZE: u32 = 10;

/// The last page whose offset still fits in a `u32`.
pub const MAX_PAGE: u32 = u32::MAX / PAGE_SIZE + 1;

/// The authenticated identity held by the client.
///
/// `display_name` is only ever populated alongside a `token`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// The pagination window over the remote review collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub offset: u32,
}

impl PaginationState {
    /// The state for `page`, clamped to `1..=MAX_PAGE`.
    pub fn at_page(page: u32) -> Self {
        let current_page = page.clamp(1, MAX_PAGE);
        Self {
            current_page,
            offset: (current_page - 1) * PAGE_SIZE,
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            offset: 0,
        }
    }
}

/// A single book review as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub detail: String,
    pub review: String,
    #[serde(default)]
    pub reviewer: String,
    /// Present only on authenticated listings; computed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mine: Option<bool>,
}

/// The editable fields of a review, used as the body of create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub title: String,
    pub url: String,
    pub detail: String,
    pub review: String,
}

impl From<ReviewRecord> for ReviewDraft {
    fn from(record: ReviewRecord) -> Self {
        Self {
            title: record.title,
            url: record.url,
            detail: record.detail,
            review: record.review,
        }
    }
}

/// The user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
}

// Represents the lifecycle of one list fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Ready,
    Failed(String),
}

/// What the review list should currently render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewState {
    /// The pagination offset this view describes.
    pub offset: u32,
    pub records: Vec<ReviewRecord>,
    pub status: ListStatus,
}

impl ListViewState {
    pub fn loading(offset: u32) -> Self {
        Self {
            offset,
            records: Vec::new(),
            status: ListStatus::Loading,
        }
    }

    pub fn page(&self) -> u32 {
        self.offset / PAGE_SIZE + 1
    }
}

/// What the review detail view should currently render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailStatus {
    Loading,
    Ready(ReviewRecord),
    Failed {
        message: String,
        /// The session was rejected and has been cleared; the user must log in again.
        login_required: bool,
    },
}
