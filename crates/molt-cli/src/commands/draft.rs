//! Draft command handlers

use anyhow::{bail, Result};

use molt_core::{DraftStore, MoltError};

use crate::commands::{save_cache, Context};
use crate::editor::{compose_draft, confirm};

/// Save a new draft; opens the editor when `content` is omitted
pub fn create(
    ctx: &Context,
    title: String,
    content: Option<String>,
    submolt: String,
) -> Result<()> {
    let content = match content {
        Some(content) => content,
        None => compose_draft(&title, &submolt)?,
    };
    let content = content.trim();
    if content.is_empty() {
        bail!("Draft content is empty");
    }

    let mut store = DraftStore::open(&ctx.settings);
    let draft = store.create(&title, content, &submolt)?;

    if ctx.output.is_quiet() {
        println!("{}", draft.id);
    } else if ctx.output.is_json() {
        ctx.output.json(&draft);
    } else {
        ctx.output.success(&format!("Saved draft {}: {}", draft.id, draft.title));
    }
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let store = DraftStore::open(&ctx.settings);
    ctx.output.print_drafts(store.list());
    Ok(())
}

pub fn show(ctx: &Context, id: String) -> Result<()> {
    let store = DraftStore::open(&ctx.settings);
    let Some(draft) = store.find(&id) else {
        ctx.output.message(&format!("Draft not found: {}", id));
        return Ok(());
    };
    ctx.output.print_draft(draft);
    Ok(())
}

pub fn delete(ctx: &Context, id: String) -> Result<()> {
    let mut store = DraftStore::open(&ctx.settings);
    let Some(draft) = store.find(&id) else {
        ctx.output.message(&format!("Draft not found: {}", id));
        return Ok(());
    };

    if ctx.output.should_prompt() {
        println!("Delete draft: {} - {}", draft.id, draft.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete(&id)?;
    ctx.output.success(&format!("Deleted draft: {}", id));
    Ok(())
}

/// Publish a draft; it is removed only once the post is created
pub fn publish(ctx: &Context, id: String, no_sig: bool) -> Result<()> {
    let client = ctx.client()?;
    let mut store = DraftStore::open(&ctx.settings);

    let published = match store.publish(&id, &client, &ctx.config, !no_sig) {
        Ok(published) => published,
        Err(MoltError::DraftNotFound(id)) => {
            ctx.output.message(&format!("Draft not found: {}", id));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut cache = ctx.cache();
    cache.record(&published.id, None);
    save_cache(&cache);

    if ctx.output.is_quiet() {
        println!("{}", published.id);
    } else if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "draft": id,
            "id": published.id,
            "url": published.url,
        }));
    } else {
        ctx.output.success(&format!("Published draft {}: {}", id, published.url));
    }
    Ok(())
}
