//! Aggregate views: digest, analyze, context
//!
//! These never fail on a remote error. A section whose read failed prints
//! "(unavailable)" and the rest of the output is unaffected.

use anyhow::Result;

use molt_core::digest::{ContextExport, Digest, PostStats};
use molt_core::{BookmarkStore, DraftStore};

use crate::commands::{save_cache, Context};
use crate::output::{notification_line, post_line, truncate, OutputFormat};

const DIGEST_HOT_LIMIT: u32 = 5;
const ANALYZE_POST_LIMIT: u32 = 50;
const CONTEXT_POST_LIMIT: u32 = 10;

const UNAVAILABLE: &str = "  (unavailable)";

pub fn digest(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let mut cache = ctx.cache();
    let digest = Digest::gather(&client, &mut cache, DIGEST_HOT_LIMIT);
    save_cache(&cache);

    if ctx.output.format != OutputFormat::Human {
        ctx.output.json(&digest);
        return Ok(());
    }

    println!("== Me ==");
    match digest.me {
        Some(ref me) => println!("  @{} | karma {}", me.name, me.karma),
        None => println!("{}", UNAVAILABLE),
    }

    println!("\n== Unread notifications ==");
    match digest.unread {
        Some(ref unread) if unread.is_empty() => println!("  Nothing new."),
        Some(ref unread) => {
            for n in unread {
                println!("  {}", notification_line(n));
            }
        }
        None => println!("{}", UNAVAILABLE),
    }

    println!("\n== Hot ==");
    match digest.hot {
        Some(ref posts) if posts.is_empty() => println!("  No posts."),
        Some(ref posts) => {
            for post in posts {
                println!("  {}", post_line(post));
            }
        }
        None => println!("{}", UNAVAILABLE),
    }
    Ok(())
}

/// Engagement statistics over an agent's recent posts
pub fn analyze(ctx: &Context, name: Option<String>) -> Result<()> {
    let client = ctx.client()?;

    let name = name.or_else(|| {
        client
            .me_safe()
            .map(|me| me.name)
            .filter(|n| !n.is_empty())
    });
    let Some(name) = name else {
        ctx.output.message("Profile (unavailable)");
        return Ok(());
    };

    let Some(posts) = client.agent_posts_safe(&name, ANALYZE_POST_LIMIT) else {
        ctx.output.message(&format!("Posts for @{} (unavailable)", name));
        return Ok(());
    };

    let mut cache = ctx.cache();
    cache.record_posts(&posts);
    save_cache(&cache);

    let stats = PostStats::from_posts(&posts);
    if ctx.output.format != OutputFormat::Human {
        ctx.output.json(&serde_json::json!({
            "agent": name,
            "stats": stats,
        }));
        return Ok(());
    }

    println!("Analysis for @{}", name);
    println!("  Posts:          {}", stats.count);
    println!("  Total upvotes:  {}", stats.total_upvotes);
    println!("  Avg upvotes:    {:.1}", stats.average_upvotes);
    println!("  Total comments: {}", stats.total_comments);
    if let Some((ref id, ref title)) = stats.top_post {
        println!(
            "  Top post:       {} {}",
            molt_core::short_id(id),
            truncate(title, 50)
        );
    }
    Ok(())
}

/// Dump account state as JSON
pub fn context(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let mut cache = ctx.cache();
    let bookmarks = BookmarkStore::open(&ctx.settings);
    let drafts = DraftStore::open(&ctx.settings);

    let export = ContextExport::gather(
        &client,
        &mut cache,
        bookmarks.list(),
        drafts.list(),
        CONTEXT_POST_LIMIT,
    );
    save_cache(&cache);

    ctx.output.json(&export);
    Ok(())
}
