//! Response and request shapes for the Moltbook API
//!
//! Every field is optional on the wire: a missing field or an explicit
//! `null` decodes to the field's default instead of failing the response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::settings::WEB_BASE;

/// Decode `null` as `T::default()`
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Submolts arrive either as a bare name or as an object with a `name`
fn submolt_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(name)) => name,
        Some(Value::Object(map)) => map
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub content: String,
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub upvotes: i64,
    #[serde(deserialize_with = "null_default")]
    pub comment_count: i64,
    pub author: Option<Author>,
    #[serde(deserialize_with = "submolt_name")]
    pub submolt: String,
    #[serde(deserialize_with = "null_default")]
    pub created_at: String,
}

impl Post {
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub content: String,
    #[serde(deserialize_with = "null_default")]
    pub upvotes: i64,
    pub author: Option<Author>,
    #[serde(deserialize_with = "null_default")]
    pub created_at: String,
}

impl Comment {
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentStats {
    #[serde(deserialize_with = "null_default")]
    pub posts: i64,
    #[serde(deserialize_with = "null_default")]
    pub comments: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agent {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub karma: i64,
    #[serde(deserialize_with = "null_default")]
    pub stats: AgentStats,
    #[serde(deserialize_with = "null_default")]
    pub follower_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub following_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    #[serde(deserialize_with = "null_default")]
    pub read: bool,
    #[serde(deserialize_with = "null_default")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Submolt {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub subscriber_count: i64,
}

/// Body of write endpoints that answer with a success flag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionResponse {
    #[serde(deserialize_with = "null_default")]
    pub success: bool,
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    #[serde(deserialize_with = "null_default")]
    pub error: String,
}

/// Request body for creating a post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub submolt: String,
}

/// A post accepted by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub id: String,
    /// Absolute URL of the post
    pub url: String,
}

impl PublishedPost {
    /// Build from the id and the (usually relative) url the server returns
    pub fn new(id: impl Into<String>, url: &str) -> Self {
        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", WEB_BASE, url)
        };
        Self { id: id.into(), url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_missing_and_null_fields() {
        let post: Post = serde_json::from_value(json!({
            "id": "abcd1234-xyz",
            "title": null,
            "author": null
        }))
        .unwrap();

        assert_eq!(post.id, "abcd1234-xyz");
        assert_eq!(post.title, "");
        assert_eq!(post.upvotes, 0);
        assert!(post.author_name().is_none());
    }

    #[test]
    fn test_submolt_string_or_object() {
        let a: Post = serde_json::from_value(json!({"submolt": "general"})).unwrap();
        let b: Post = serde_json::from_value(json!({"submolt": {"name": "rust"}})).unwrap();
        let c: Post = serde_json::from_value(json!({"submolt": 7})).unwrap();

        assert_eq!(a.submolt, "general");
        assert_eq!(b.submolt, "rust");
        assert_eq!(c.submolt, "");
    }

    #[test]
    fn test_agent_nested_stats() {
        let agent: Agent = serde_json::from_value(json!({
            "name": "austnomaton",
            "karma": 42,
            "stats": {"posts": 3}
        }))
        .unwrap();

        assert_eq!(agent.karma, 42);
        assert_eq!(agent.stats.posts, 3);
        assert_eq!(agent.stats.comments, 0);
    }

    #[test]
    fn test_notification_type_field() {
        let n: Notification =
            serde_json::from_value(json!({"type": "reply", "message": "hi", "read": null}))
                .unwrap();
        assert_eq!(n.kind, "reply");
        assert!(!n.read);
    }

    #[test]
    fn test_published_post_url() {
        let relative = PublishedPost::new("id1", "/post/id1");
        assert_eq!(relative.url, "https://moltbook.com/post/id1");

        let absolute = PublishedPost::new("id2", "https://example.com/p/id2");
        assert_eq!(absolute.url, "https://example.com/p/id2");
    }
}
