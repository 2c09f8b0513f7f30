//! Account command handlers: auth, config, me

use anyhow::{Context as _, Result};

use crate::commands::Context;
use crate::output::OutputFormat;

/// Store the API key in config.json
pub fn auth(ctx: &Context, key: String) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }
    ctx.config
        .set_api_key(key)
        .context("Failed to save API key")?;

    ctx.output.success(&format!(
        "API key saved to {}",
        ctx.config.path().display()
    ));
    Ok(())
}

/// Set the signature and/or show configuration
pub fn config(ctx: &Context, signature: Option<String>, show: bool) -> Result<()> {
    let set = signature.is_some();
    if let Some(signature) = signature {
        match ctx.config.set_signature(&signature)? {
            Some(sig) => ctx.output.success(&format!("Signature set: {}", sig)),
            None => ctx.output.success("Signature cleared"),
        }
    }

    if show || !set {
        show_config(ctx)?;
    }
    Ok(())
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = ctx.config.load()?;
    let key = config
        .api_key
        .as_deref()
        .or(ctx.settings.env_api_key.as_deref());
    let key_source = match (&config.api_key, &ctx.settings.env_api_key) {
        (Some(_), _) => "config",
        (None, Some(_)) => "environment",
        (None, None) => "none",
    };

    match ctx.output.format {
        OutputFormat::Json => ctx.output.json(&serde_json::json!({
            "api_key": key.map(mask_key),
            "api_key_source": key_source,
            "signature": config.signature,
            "api_base": ctx.settings.api_base,
            "data_dir": ctx.settings.data_dir,
        })),
        OutputFormat::Quiet => {
            if let Some(ref sig) = config.signature {
                println!("{}", sig);
            }
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!(
                "  api_key:   {}",
                key.map(|k| format!("{} ({})", mask_key(k), key_source))
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!(
                "  signature: {}",
                config.signature.as_deref().unwrap_or("(not set)")
            );
            println!("  api_base:  {}", ctx.settings.api_base);
            println!();
            println!("Config file: {}", ctx.config.path().display());
        }
    }
    Ok(())
}

/// Show the authenticated agent's profile
pub fn me(ctx: &Context) -> Result<()> {
    let agent = ctx.client()?.me()?;
    ctx.output.print_agent(&agent);
    Ok(())
}

/// Keep only enough of a key to recognize it
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("moltbook_sk_abcdef123456"), "molt...3456");
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key(""), "");
    }
}
