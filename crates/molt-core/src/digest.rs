//! Best-effort aggregation
//!
//! Digest, analysis, and context export combine several independent reads.
//! Each read goes through safe mode, so one failing call leaves its section
//! empty instead of failing the whole command.

use serde::Serialize;

use crate::api::{Agent, ApiClient, Notification, Post};
use crate::cache::PostRefCache;
use crate::models::{Bookmark, Draft};

/// Overview of the account and the feed
#[derive(Debug, Clone, Default, Serialize)]
pub struct Digest {
    pub me: Option<Agent>,
    /// Unread notifications only
    pub unread: Option<Vec<Notification>>,
    pub hot: Option<Vec<Post>>,
}

impl Digest {
    pub fn gather(client: &ApiClient, cache: &mut PostRefCache, hot_limit: u32) -> Self {
        let me = client.me_safe();
        let unread = client
            .notifications_safe()
            .map(|all| all.into_iter().filter(|n| !n.read).collect());
        let hot = client.feed_safe("hot", hot_limit);
        if let Some(ref posts) = hot {
            cache.record_posts(posts);
        }
        Self { me, unread, hot }
    }
}

/// Engagement statistics over a set of posts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostStats {
    pub count: usize,
    pub total_upvotes: i64,
    pub total_comments: i64,
    pub average_upvotes: f64,
    /// Id and title of the most upvoted post
    pub top_post: Option<(String, String)>,
}

impl PostStats {
    pub fn from_posts(posts: &[Post]) -> Self {
        if posts.is_empty() {
            return Self::default();
        }

        let total_upvotes: i64 = posts.iter().map(|p| p.upvotes).sum();
        let total_comments: i64 = posts.iter().map(|p| p.comment_count).sum();
        // max_by_key keeps the last maximum; reverse so the earliest wins ties
        let top_post = posts
            .iter()
            .rev()
            .max_by_key(|p| p.upvotes)
            .map(|p| (p.id.clone(), p.title.clone()));

        Self {
            count: posts.len(),
            total_upvotes,
            total_comments,
            average_upvotes: total_upvotes as f64 / posts.len() as f64,
            top_post,
        }
    }
}

/// Snapshot of account state for handing to another tool
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContextExport {
    pub agent: Option<Agent>,
    pub recent_posts: Option<Vec<Post>>,
    pub notifications: Option<Vec<Notification>>,
    pub bookmarks: Vec<Bookmark>,
    pub drafts: Vec<Draft>,
}

impl ContextExport {
    pub fn gather(
        client: &ApiClient,
        cache: &mut PostRefCache,
        bookmarks: &[Bookmark],
        drafts: &[Draft],
        post_limit: u32,
    ) -> Self {
        let agent = client.me_safe();
        let recent_posts = agent
            .as_ref()
            .filter(|a| !a.name.is_empty())
            .and_then(|a| client.agent_posts_safe(&a.name, post_limit));
        if let Some(ref posts) = recent_posts {
            cache.record_posts(posts);
        }

        Self {
            agent,
            recent_posts,
            notifications: client.notifications_safe(),
            bookmarks: bookmarks.to_vec(),
            drafts: drafts.to_vec(),
        }
    }
}
