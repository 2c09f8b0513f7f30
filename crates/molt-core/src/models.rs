//! Local records for molt
//!
//! Defines the records kept on disk: cached post references, bookmarks,
//! and drafts. Timestamps are unix seconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of leading characters of a post id used as its short form
pub const SHORT_ID_LEN: usize = 8;

/// The first eight characters of `id` (or all of it if shorter)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Current time as unix seconds
pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}

/// Render a unix timestamp for display
pub fn format_ts(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// A post reference remembered by the cache
///
/// Stored in post_cache.json as the value of a map keyed by short id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub full_id: String,
    #[serde(default)]
    pub author: Option<String>,
    /// When this post was last seen
    #[serde(rename = "seen")]
    pub seen_at: i64,
}

impl CacheEntry {
    pub fn short_id(&self) -> &str {
        short_id(&self.full_id)
    }
}

/// A saved post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    /// Full post id
    pub id: String,
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub note: Option<String>,
    pub saved_at: i64,
}

impl Bookmark {
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        title: impl Into<String>,
        note: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            title: title.into(),
            note: note.filter(|n| !n.is_empty()),
            saved_at: now_ts(),
        }
    }

    /// True if `id` names this bookmark by full id or by short id
    pub fn matches(&self, id: &str) -> bool {
        self.id == id || short_id(&self.id) == short_id(id)
    }
}

/// An unpublished post kept locally
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draft {
    /// Locally generated 8-character id
    pub id: String,
    pub title: String,
    pub content: String,
    pub submolt: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Draft {
    /// Create a draft with a fresh id
    ///
    /// The id is a truncated v4 UUID. Uniqueness against existing drafts is
    /// not checked; at eight hex characters a collision is possible but
    /// unlikely for a personal draft list.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        submolt: impl Into<String>,
    ) -> Self {
        let now = now_ts();
        Self {
            id: Uuid::new_v4().simple().to_string()[..SHORT_ID_LEN].to_string(),
            title: title.into(),
            content: content.into(),
            submolt: submolt.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
