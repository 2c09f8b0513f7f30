//! Interactive editing support
//!
//! `draft new` without content opens $EDITOR on a scratch file seeded with
//! a short header naming the draft. Header lines are stripped from what the
//! editor leaves behind, so they never reach the stored draft.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Lines starting with this are editor instructions, not draft content
const HEADER_PREFIX: &str = "#:";

/// Write a draft body in the user's editor
pub fn compose_draft(title: &str, submolt: &str) -> Result<String> {
    compose_with(&find_editor()?, title, submolt)
}

fn compose_with(editor: &str, title: &str, submolt: &str) -> Result<String> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("Editor command is empty");
    };

    // Removed on drop, whichever way this function returns
    let mut scratch = tempfile::Builder::new()
        .prefix("molt_draft_")
        .suffix(".md")
        .tempfile()
        .context("Failed to create scratch file for the draft")?;
    scratch
        .write_all(draft_template(title, submolt).as_bytes())
        .context("Failed to write scratch file for the draft")?;
    scratch.flush()?;

    let status = Command::new(program)
        .args(parts)
        .arg(scratch.path())
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        bail!(
            "Editor '{}' exited with non-zero status; the draft was not saved.",
            editor
        );
    }

    // Editors that save by rename leave a new file at the same path
    let written = fs::read_to_string(scratch.path())
        .with_context(|| format!("Failed to read draft from {:?}", scratch.path()))?;

    Ok(strip_header(&written))
}

fn draft_template(title: &str, submolt: &str) -> String {
    format!(
        "{p} Draft: {}\n{p} Posting to m/{}\n{p} Lines starting with '{p}' are ignored.\n\n",
        title,
        submolt,
        p = HEADER_PREFIX
    )
}

fn strip_header(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with(HEADER_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// $EDITOR, then $VISUAL, then the first common editor on PATH
fn find_editor() -> Result<String> {
    let configured = ["EDITOR", "VISUAL"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty());
    if let Some(editor) = configured {
        return Ok(editor);
    }

    ["nano", "vim", "vi", "emacs"]
        .into_iter()
        .find(|cmd| command_exists(cmd))
        .map(str::to_string)
        .context(
            "No editor found. Set $EDITOR or pass the draft content as an argument.\n\
             Example: export EDITOR=nano",
        )
}

fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Ask a yes/no question; always "no" without a TTY on stdin
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
