//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use molt_core::api::{Agent, Comment, Notification, Post, Submolt};
use molt_core::models::format_ts;
use molt_core::{short_id, Bookmark, Draft};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print any serializable value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode output: {}", e),
        }
    }

    /// Print a list of posts, one line each
    pub fn print_posts(&self, posts: &[Post]) {
        match self.format {
            OutputFormat::Human => {
                if posts.is_empty() {
                    println!("No posts found.");
                    return;
                }
                for post in posts {
                    println!("{}", post_line(post));
                }
            }
            OutputFormat::Json => self.json(posts),
            OutputFormat::Quiet => {
                for post in posts {
                    println!("{}", post.id);
                }
            }
        }
    }

    /// Print a single post in full
    pub fn print_post(&self, post: &Post) {
        match self.format {
            OutputFormat::Human => {
                println!("# {}", post.title);
                println!(
                    "by @{} | ⬆{} | {} comments",
                    post.author_name().unwrap_or("?"),
                    post.upvotes,
                    post.comment_count
                );
                if !post.submolt.is_empty() {
                    println!("in m/{}", post.submolt);
                }
                println!();
                println!("{}", post.content);
            }
            OutputFormat::Json => self.json(post),
            OutputFormat::Quiet => println!("{}", post.id),
        }
    }

    pub fn print_comments(&self, comments: &[Comment]) {
        match self.format {
            OutputFormat::Human => {
                if comments.is_empty() {
                    println!("No comments yet.");
                    return;
                }
                for comment in comments {
                    println!("@{} | ⬆{}", comment.author_name(), comment.upvotes);
                    for line in comment.content.lines() {
                        println!("  {}", line);
                    }
                    println!();
                }
                println!("{} comment(s)", comments.len());
            }
            OutputFormat::Json => self.json(comments),
            OutputFormat::Quiet => {
                for comment in comments {
                    println!("{}", comment.id);
                }
            }
        }
    }

    pub fn print_agent(&self, agent: &Agent) {
        match self.format {
            OutputFormat::Human => {
                println!("@{}", agent.name);
                println!("Karma: {}", agent.karma);
                println!(
                    "Posts: {} | Comments: {}",
                    agent.stats.posts, agent.stats.comments
                );
                if agent.follower_count > 0 || agent.following_count > 0 {
                    println!(
                        "Followers: {} | Following: {}",
                        agent.follower_count, agent.following_count
                    );
                }
                if !agent.description.is_empty() {
                    println!("\n{}", agent.description);
                }
            }
            OutputFormat::Json => self.json(agent),
            OutputFormat::Quiet => println!("{}", agent.name),
        }
    }

    pub fn print_agents(&self, agents: &[Agent]) {
        match self.format {
            OutputFormat::Human => {
                if agents.is_empty() {
                    println!("Nobody here yet.");
                    return;
                }
                for agent in agents {
                    println!("@{:20} karma {}", agent.name, agent.karma);
                }
                println!("\n{} agent(s)", agents.len());
            }
            OutputFormat::Json => self.json(agents),
            OutputFormat::Quiet => {
                for agent in agents {
                    println!("{}", agent.name);
                }
            }
        }
    }

    pub fn print_notifications(&self, notifications: &[Notification]) {
        match self.format {
            OutputFormat::Human => {
                if notifications.is_empty() {
                    println!("No notifications.");
                    return;
                }
                for n in notifications {
                    println!("{}", notification_line(n));
                }
            }
            OutputFormat::Json => self.json(notifications),
            OutputFormat::Quiet => {
                for n in notifications {
                    println!("{}", n.id);
                }
            }
        }
    }

    pub fn print_submolts(&self, submolts: &[Submolt]) {
        match self.format {
            OutputFormat::Human => {
                if submolts.is_empty() {
                    println!("No submolts found.");
                    return;
                }
                for s in submolts {
                    println!(
                        "m/{:20} {:>6} members | {}",
                        s.name,
                        s.subscriber_count,
                        truncate(&s.description, 50)
                    );
                }
            }
            OutputFormat::Json => self.json(submolts),
            OutputFormat::Quiet => {
                for s in submolts {
                    println!("{}", s.name);
                }
            }
        }
    }

    pub fn print_bookmarks(&self, bookmarks: &[Bookmark]) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks.");
                    return;
                }
                for b in bookmarks {
                    println!(
                        "{} | @{:15} | {} | {}",
                        short_id(&b.id),
                        b.author,
                        truncate(&b.title, 40),
                        format_ts(b.saved_at)
                    );
                    if let Some(ref note) = b.note {
                        println!("         note: {}", truncate_line(note, 60));
                    }
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => self.json(bookmarks),
            OutputFormat::Quiet => {
                for b in bookmarks {
                    println!("{}", b.id);
                }
            }
        }
    }

    pub fn print_drafts(&self, drafts: &[Draft]) {
        match self.format {
            OutputFormat::Human => {
                if drafts.is_empty() {
                    println!("No drafts.");
                    return;
                }
                for d in drafts {
                    println!(
                        "{} | m/{:12} | {} | {}",
                        d.id,
                        d.submolt,
                        truncate(&d.title, 40),
                        format_ts(d.updated_at)
                    );
                }
                println!("\n{} draft(s)", drafts.len());
            }
            OutputFormat::Json => self.json(drafts),
            OutputFormat::Quiet => {
                for d in drafts {
                    println!("{}", d.id);
                }
            }
        }
    }

    pub fn print_draft(&self, draft: &Draft) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", draft.id);
                println!("Title:   {}", draft.title);
                println!("Submolt: {}", draft.submolt);
                println!("Created: {}", format_ts(draft.created_at));
                println!("Updated: {}", format_ts(draft.updated_at));
                println!();
                println!("{}", draft.content);
            }
            OutputFormat::Json => self.json(draft),
            OutputFormat::Quiet => println!("{}", draft.id),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a failure that is not an error (e.g. `success: false`)
    pub fn failure(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("Failed: {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "failed", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// One-line summary of a post
pub fn post_line(post: &Post) -> String {
    format!(
        "{} | @{:15} | ⬆{:4} | {}",
        short_id(&post.id),
        post.author_name().unwrap_or("?"),
        post.upvotes,
        truncate(&post.title, 50)
    )
}

pub fn notification_line(n: &Notification) -> String {
    let marker = if n.read { " " } else { "•" };
    if n.kind.is_empty() {
        format!("{} {}", marker, n.message)
    } else {
        format!("{} [{}] {}", marker, n.kind, n.message)
    }
}

/// Truncate a string to max length in characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
pub fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use molt_core::api::Author;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("ünïcödé ünïcödé", 8), "ünïcö...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
    }

    #[test]
    fn test_post_line() {
        let post = Post {
            id: "abcd1234-5678".to_string(),
            title: "Hello Moltbook".to_string(),
            upvotes: 7,
            author: Some(Author {
                name: "austnomaton".to_string(),
            }),
            ..Post::default()
        };
        assert_eq!(
            post_line(&post),
            "abcd1234 | @austnomaton     | ⬆   7 | Hello Moltbook"
        );
    }

    #[test]
    fn test_post_line_missing_author() {
        let post = Post {
            id: "ffff0000".to_string(),
            ..Post::default()
        };
        assert!(post_line(&post).contains("@?"));
    }

    #[test]
    fn test_notification_line() {
        let n = Notification {
            kind: "reply".to_string(),
            message: "bob replied".to_string(),
            ..Notification::default()
        };
        assert_eq!(notification_line(&n), "• [reply] bob replied");
    }
}
