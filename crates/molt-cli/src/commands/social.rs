//! Social command handlers: follows, profiles, notifications

use anyhow::Result;

use crate::commands::{report_action, Context};

pub fn follow(ctx: &Context, name: String) -> Result<()> {
    let resp = ctx.client()?.follow(&name)?;
    report_action(&resp, &format!("Following @{}", name), &ctx.output);
    Ok(())
}

pub fn unfollow(ctx: &Context, name: String) -> Result<()> {
    let resp = ctx.client()?.unfollow(&name)?;
    report_action(&resp, &format!("Unfollowed @{}", name), &ctx.output);
    Ok(())
}

pub fn profile(ctx: &Context, name: String) -> Result<()> {
    let agent = ctx.client()?.profile(&name)?;
    ctx.output.print_agent(&agent);
    Ok(())
}

pub fn following(ctx: &Context) -> Result<()> {
    let agents = ctx.client()?.following()?;
    ctx.output.print_agents(&agents);
    Ok(())
}

pub fn followers(ctx: &Context) -> Result<()> {
    let agents = ctx.client()?.followers()?;
    ctx.output.print_agents(&agents);
    Ok(())
}

/// List notifications, then optionally mark them all read
pub fn notifications(ctx: &Context, mark_read: bool) -> Result<()> {
    let client = ctx.client()?;
    let notifications = client.notifications()?;
    ctx.output.print_notifications(&notifications);

    if mark_read {
        let resp = client.mark_notifications_read()?;
        report_action(&resp, "Marked all as read", &ctx.output);
    }
    Ok(())
}
