//! Post command handlers
//!
//! Every listing records the posts it shows into the post cache, so the
//! short ids printed here can be used in follow-up commands.

use anyhow::Result;

use molt_core::api::NewPost;
use molt_core::signature::append_signature;

use crate::commands::{report_action, save_cache, Context};

/// List recent posts
pub fn feed(ctx: &Context, limit: u32, sort: String) -> Result<()> {
    let posts = ctx.client()?.feed(&sort, limit)?;

    let mut cache = ctx.cache();
    cache.record_posts(&posts);
    save_cache(&cache);

    ctx.output.print_posts(&posts);
    Ok(())
}

/// Show one post in full
pub fn read(ctx: &Context, post: String) -> Result<()> {
    let client = ctx.client()?;
    let mut cache = ctx.cache();
    let post = client.post(&cache.resolve(&post))?;

    cache.record(&post.id, post.author_name());
    save_cache(&cache);

    ctx.output.print_post(&post);
    Ok(())
}

pub fn comments(ctx: &Context, post: String) -> Result<()> {
    let client = ctx.client()?;
    let post_id = ctx.cache().resolve(&post);
    let comments = client.comments(&post_id)?;
    ctx.output.print_comments(&comments);
    Ok(())
}

/// Create a post, appending the configured signature unless `no_sig`
pub fn create(
    ctx: &Context,
    title: String,
    content: String,
    submolt: String,
    no_sig: bool,
) -> Result<()> {
    let client = ctx.client()?;

    let content = if no_sig {
        content
    } else {
        append_signature(&content, ctx.config.signature()?.as_deref())
    };

    let published = client.create_post(&NewPost {
        title,
        content,
        submolt,
    })?;

    let mut cache = ctx.cache();
    cache.record(&published.id, None);
    save_cache(&cache);

    if ctx.output.is_quiet() {
        println!("{}", published.id);
    } else if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "id": published.id,
            "url": published.url,
        }));
    } else {
        ctx.output.success(&format!("Posted: {}", published.url));
    }
    Ok(())
}

pub fn upvote(ctx: &Context, post: String) -> Result<()> {
    let client = ctx.client()?;
    let post_id = ctx.cache().resolve(&post);
    let resp = client.upvote(&post_id)?;
    report_action(&resp, "Upvoted", &ctx.output);
    Ok(())
}

pub fn comment(ctx: &Context, post: String, text: String) -> Result<()> {
    let client = ctx.client()?;
    let post_id = ctx.cache().resolve(&post);
    let resp = client.comment(&post_id, &text)?;
    report_action(&resp, "Comment posted", &ctx.output);
    Ok(())
}

/// List an agent's posts; the authenticated agent's when `name` is omitted
pub fn agent_posts(ctx: &Context, name: Option<String>, limit: u32) -> Result<()> {
    let client = ctx.client()?;
    let name = match name {
        Some(name) => name,
        None => client.me()?.name,
    };
    let posts = client.agent_posts(&name, limit)?;

    let mut cache = ctx.cache();
    cache.record_posts(&posts);
    save_cache(&cache);

    ctx.output.print_posts(&posts);
    Ok(())
}

pub fn search(ctx: &Context, query: String, limit: u32) -> Result<()> {
    let posts = ctx.client()?.search(&query, limit)?;

    let mut cache = ctx.cache();
    cache.record_posts(&posts);
    save_cache(&cache);

    ctx.output.print_posts(&posts);
    Ok(())
}

pub fn submolts(ctx: &Context) -> Result<()> {
    let submolts = ctx.client()?.submolts()?;
    ctx.output.print_submolts(&submolts);
    Ok(())
}
