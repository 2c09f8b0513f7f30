//! Moltbook REST boundary
//!
//! - `client`: authenticated request construction, strict and safe modes
//! - `endpoints`: typed operations (posts, comments, agents, notifications)
//! - `types`: defensively decoded response shapes
//!
//! The `PostPublisher` and `FeedSource` traits are the seams the draft
//! store and the feed watcher depend on, so both can run against a fake.

mod client;
mod endpoints;
mod types;

pub use client::ApiClient;
pub use reqwest::Method;
pub use types::{
    ActionResponse, Agent, AgentStats, Author, Comment, NewPost, Notification, Post,
    PublishedPost, Submolt,
};

use crate::error::Result;

/// Something that can create a post
pub trait PostPublisher {
    fn publish(&self, post: &NewPost) -> Result<PublishedPost>;
}

/// A best-effort source of recent posts
///
/// `None` means the read failed; the caller keeps going.
pub trait FeedSource {
    fn recent_posts(&self, sort: &str, limit: u32) -> Option<Vec<Post>>;
}
