//! Bookmark command handlers

use anyhow::{Context as _, Result};

use molt_core::api::Post;
use molt_core::{short_id, AddOutcome, BookmarkStore, PostRefCache};

use crate::commands::{save_cache, Context};
use crate::editor::confirm;

/// Bookmark a post, fetching it for its author and title
pub fn add(ctx: &Context, post: String, note: Option<String>) -> Result<()> {
    let client = ctx.client()?;
    let mut cache = ctx.cache();
    let post_id = cache.resolve(&post);

    let fetched = client.post(&post_id)?;
    let full_id = if fetched.id.is_empty() {
        post_id
    } else {
        fetched.id.clone()
    };
    let author = known_author(&fetched, &cache, &full_id);

    cache.record(&full_id, author.as_deref());
    save_cache(&cache);
    let author = author.unwrap_or_else(|| "?".to_string());

    let mut store = BookmarkStore::open(&ctx.settings);
    match store
        .add(&full_id, &author, &fetched.title, note, &cache)
        .context("Failed to save bookmark")?
    {
        AddOutcome::Added(bookmark) => {
            if ctx.output.is_json() {
                ctx.output.json(&bookmark);
            } else {
                ctx.output.success(&format!(
                    "Bookmarked {}: {}",
                    short_id(&bookmark.id),
                    bookmark.title
                ));
            }
        }
        AddOutcome::AlreadyBookmarked(existing) => {
            ctx.output.message(&format!("Already bookmarked: {}", short_id(&existing.id)));
        }
    }
    Ok(())
}

/// Author from the post itself, else from when the cache last saw it
fn known_author(post: &Post, cache: &PostRefCache, full_id: &str) -> Option<String> {
    post.author_name()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| cache.get(short_id(full_id))?.author.clone())
}

pub fn remove(ctx: &Context, post: String) -> Result<()> {
    let mut store = BookmarkStore::open(&ctx.settings);
    let id = ctx.cache().resolve(&post);

    match store.remove(&id)? {
        Some(removed) => ctx
            .output
            .success(&format!("Removed bookmark: {}", short_id(&removed.id))),
        None => ctx.output.message(&format!("Bookmark not found: {}", post)),
    }
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let store = BookmarkStore::open(&ctx.settings);
    ctx.output.print_bookmarks(store.list());
    Ok(())
}

/// Remove every bookmark, asking first when interactive
pub fn clear(ctx: &Context) -> Result<()> {
    let mut store = BookmarkStore::open(&ctx.settings);
    if store.list().is_empty() {
        ctx.output.message("No bookmarks.");
        return Ok(());
    }

    if ctx.output.should_prompt() {
        println!("Remove all {} bookmark(s)", store.list().len());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let count = store.clear()?;
    ctx.output.success(&format!("Cleared {} bookmark(s)", count));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Output, OutputFormat};
    use molt_core::api::Author;
    use molt_core::Settings;
    use tempfile::TempDir;

    fn quiet_context(temp_dir: &TempDir) -> Context {
        Context::new(
            Settings::with_data_dir(temp_dir.path()),
            Output::new(OutputFormat::Quiet),
        )
    }

    #[test]
    fn test_remove_by_short_id() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = quiet_context(&temp_dir);
        let cache = PostRefCache::open(&ctx.settings);
        let mut store = BookmarkStore::open(&ctx.settings);
        store
            .add("abcd1234-0000-4000-8000-000000000000", "eve", "Hi", None, &cache)
            .unwrap();

        remove(&ctx, "abcd1234".into()).unwrap();
        assert!(BookmarkStore::open(&ctx.settings).list().is_empty());
    }

    #[test]
    fn test_author_falls_back_to_cache() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = PostRefCache::load(temp_dir.path().join("post_cache.json"));
        let full_id = "abcd1234-0000-4000-8000-000000000000";
        cache.record(full_id, Some("eve"));

        let anonymous = Post {
            id: full_id.to_string(),
            ..Post::default()
        };
        assert_eq!(known_author(&anonymous, &cache, full_id).as_deref(), Some("eve"));

        let signed = Post {
            author: Some(Author {
                name: "mallory".to_string(),
            }),
            ..anonymous.clone()
        };
        assert_eq!(known_author(&signed, &cache, full_id).as_deref(), Some("mallory"));

        let unknown = "ffff0000-0000-4000-8000-000000000000";
        assert!(known_author(&anonymous, &cache, unknown).is_none());
    }

    #[test]
    fn test_remove_missing_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = quiet_context(&temp_dir);

        remove(&ctx, "ffff0000".into()).unwrap();
        assert!(!ctx.settings.bookmarks_path().exists());
    }

    #[test]
    fn test_clear_in_quiet_mode() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = quiet_context(&temp_dir);
        let cache = PostRefCache::open(&ctx.settings);
        let mut store = BookmarkStore::open(&ctx.settings);
        store.add("aaaa1111-x", "a", "one", None, &cache).unwrap();
        store.add("bbbb2222-y", "b", "two", None, &cache).unwrap();

        clear(&ctx).unwrap();
        assert!(BookmarkStore::open(&ctx.settings).list().is_empty());
    }
}
