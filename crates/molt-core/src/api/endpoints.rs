//! Typed Moltbook operations on top of [`ApiClient`]

use reqwest::Method;
use serde_json::{json, Value};

use super::client::{decode_field, ApiClient};
use super::types::{
    ActionResponse, Agent, Comment, NewPost, Notification, Post, PublishedPost, Submolt,
};
use super::{FeedSource, PostPublisher};
use crate::error::{MoltError, Result};

fn action(value: Value) -> Result<ActionResponse> {
    serde_json::from_value(value).map_err(|e| MoltError::Decode(e.to_string()))
}

fn limit_query(limit: u32) -> (&'static str, String) {
    ("limit", limit.to_string())
}

impl ApiClient {
    /// Recent posts, sorted by `sort` (new, hot, top, rising)
    pub fn feed(&self, sort: &str, limit: u32) -> Result<Vec<Post>> {
        self.get_field(
            "/posts",
            &[limit_query(limit), ("sort", sort.to_string())],
            "posts",
        )
    }

    pub fn feed_safe(&self, sort: &str, limit: u32) -> Option<Vec<Post>> {
        self.get_field_safe(
            "/posts",
            &[limit_query(limit), ("sort", sort.to_string())],
            "posts",
        )
    }

    pub fn post(&self, id: &str) -> Result<Post> {
        self.get_field(&format!("/posts/{}", id), &[], "post")
    }

    pub fn comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.get_field(&format!("/posts/{}/comments", post_id), &[], "comments")
    }

    /// Create a post; a `success: false` body is `Rejected`
    pub fn create_post(&self, post: &NewPost) -> Result<PublishedPost> {
        let body = serde_json::to_value(post).map_err(|e| MoltError::Decode(e.to_string()))?;
        let resp = self.request(Method::POST, "/posts", &[], Some(&body))?;

        let outcome = action(resp.clone())?;
        if !outcome.success {
            return Err(MoltError::Rejected(outcome.error));
        }

        let created: Post = decode_field(&resp, "post")?;
        Ok(PublishedPost::new(created.id, &created.url))
    }

    pub fn upvote(&self, post_id: &str) -> Result<ActionResponse> {
        let path = format!("/posts/{}/upvote", post_id);
        action(self.request(Method::POST, &path, &[], None)?)
    }

    pub fn comment(&self, post_id: &str, text: &str) -> Result<ActionResponse> {
        let path = format!("/posts/{}/comments", post_id);
        let body = json!({ "content": text });
        action(self.request(Method::POST, &path, &[], Some(&body))?)
    }

    pub fn follow(&self, name: &str) -> Result<ActionResponse> {
        let path = format!("/agents/{}/follow", name);
        action(self.request(Method::POST, &path, &[], None)?)
    }

    pub fn unfollow(&self, name: &str) -> Result<ActionResponse> {
        let path = format!("/agents/{}/follow", name);
        action(self.request(Method::DELETE, &path, &[], None)?)
    }

    pub fn profile(&self, name: &str) -> Result<Agent> {
        self.get_field("/agents/profile", &[("name", name.to_string())], "agent")
    }

    pub fn me(&self) -> Result<Agent> {
        self.get_field("/agents/me", &[], "agent")
    }

    pub fn me_safe(&self) -> Option<Agent> {
        self.get_field_safe("/agents/me", &[], "agent")
    }

    pub fn notifications(&self) -> Result<Vec<Notification>> {
        self.get_field("/notifications", &[], "notifications")
    }

    pub fn notifications_safe(&self) -> Option<Vec<Notification>> {
        self.get_field_safe("/notifications", &[], "notifications")
    }

    pub fn mark_notifications_read(&self) -> Result<ActionResponse> {
        action(self.request(Method::POST, "/notifications/read", &[], None)?)
    }

    pub fn agent_posts(&self, name: &str, limit: u32) -> Result<Vec<Post>> {
        self.get_field(&format!("/agents/{}/posts", name), &[limit_query(limit)], "posts")
    }

    pub fn agent_posts_safe(&self, name: &str, limit: u32) -> Option<Vec<Post>> {
        self.get_field_safe(&format!("/agents/{}/posts", name), &[limit_query(limit)], "posts")
    }

    pub fn search(&self, query: &str, limit: u32) -> Result<Vec<Post>> {
        self.get_field(
            "/search",
            &[("q", query.to_string()), limit_query(limit)],
            "posts",
        )
    }

    pub fn submolts(&self) -> Result<Vec<Submolt>> {
        self.get_field("/submolts", &[], "submolts")
    }

    pub fn following(&self) -> Result<Vec<Agent>> {
        self.get_field("/agents/me/following", &[], "agents")
    }

    pub fn followers(&self) -> Result<Vec<Agent>> {
        self.get_field("/agents/me/followers", &[], "agents")
    }
}

impl PostPublisher for ApiClient {
    fn publish(&self, post: &NewPost) -> Result<PublishedPost> {
        self.create_post(post)
    }
}

impl FeedSource for ApiClient {
    fn recent_posts(&self, sort: &str, limit: u32) -> Option<Vec<Post>> {
        self.feed_safe(sort, limit)
    }
}
