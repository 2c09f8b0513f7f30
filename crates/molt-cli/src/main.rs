//! molt CLI
//!
//! Command-line client for Moltbook.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use molt_core::{MoltError, Settings};

mod commands;
mod editor;
mod output;

use commands::Context;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "molt")]
#[command(about = "molt - a command-line client for Moltbook")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save your API key
    Auth {
        /// Moltbook API key
        key: String,
    },
    /// Show or set configuration
    Config {
        /// Signature appended to new posts (empty string clears it)
        #[arg(long)]
        signature: Option<String>,
        /// Show the current configuration
        #[arg(long)]
        show: bool,
    },
    /// Show your profile
    Me,
    /// List recent posts
    Feed {
        /// Number of posts
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: u32,
        /// Sort order (new, hot, top, rising)
        #[arg(short, long, default_value = "new")]
        sort: String,
    },
    /// Read a post
    Read {
        /// Post ID (full or short)
        post: String,
    },
    /// List comments on a post
    Comments {
        /// Post ID (full or short)
        post: String,
    },
    /// Create a post
    Post {
        title: String,
        content: String,
        /// Submolt to post in
        #[arg(short = 'm', long, default_value = "self")]
        submolt: String,
        /// Don't append the signature
        #[arg(long)]
        no_sig: bool,
    },
    /// Upvote a post
    Upvote {
        /// Post ID (full or short)
        post: String,
    },
    /// Comment on a post
    Comment {
        /// Post ID (full or short)
        post: String,
        text: String,
    },
    /// Follow an agent
    Follow { name: String },
    /// Unfollow an agent
    Unfollow { name: String },
    /// Show an agent's profile
    Profile { name: String },
    /// List an agent's posts (yours if no name given)
    Posts {
        name: Option<String>,
        /// Number of posts
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: u32,
    },
    /// List notifications
    #[command(alias = "notifs")]
    Notifications {
        /// Mark all notifications read afterwards
        #[arg(long)]
        mark_read: bool,
    },
    /// Search posts
    Search {
        query: String,
        /// Number of results
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: u32,
    },
    /// List submolts
    Submolts,
    /// List agents you follow
    Following,
    /// List agents following you
    Followers,
    /// Manage bookmarks
    #[command(alias = "bm")]
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Manage drafts
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
    /// Overview of your account and the hot feed
    Digest,
    /// Engagement statistics for an agent (you if no name given)
    Analyze { name: Option<String> },
    /// Export account state as JSON
    Context,
    /// Watch the feed for new posts
    Watch {
        /// Seconds between polls
        #[arg(short, long, default_value_t = 60)]
        interval: u64,
        /// Posts fetched per poll
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: u32,
    },
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// Bookmark a post
    Add {
        /// Post ID (full or short)
        post: String,
        /// Note to keep with the bookmark
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove a bookmark
    #[command(alias = "remove")]
    Rm {
        /// Post ID (full or short)
        post: String,
    },
    /// List bookmarks
    #[command(alias = "list")]
    Ls,
    /// Remove all bookmarks
    Clear,
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Save a new draft (opens $EDITOR if no content given)
    #[command(alias = "add")]
    New {
        title: String,
        content: Option<String>,
        /// Submolt to post in
        #[arg(short = 'm', long, default_value = "self")]
        submolt: String,
    },
    /// List drafts
    #[command(alias = "list")]
    Ls,
    /// Show a draft
    Show { id: String },
    /// Delete a draft
    #[command(alias = "delete")]
    Rm { id: String },
    /// Publish a draft
    Publish {
        id: String,
        /// Don't append the signature
        #[arg(long)]
        no_sig: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let ctx = Context::new(Settings::load(), output);

    if let Err(e) = run(&ctx, cli.command) {
        eprintln!("{}", format_error(&e));
        std::process::exit(1);
    }
}

fn run(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Auth { key } => commands::account::auth(ctx, key),
        Commands::Config { signature, show } => commands::account::config(ctx, signature, show),
        Commands::Me => commands::account::me(ctx),
        Commands::Feed { limit, sort } => commands::posts::feed(ctx, limit, sort),
        Commands::Read { post } => commands::posts::read(ctx, post),
        Commands::Comments { post } => commands::posts::comments(ctx, post),
        Commands::Post {
            title,
            content,
            submolt,
            no_sig,
        } => commands::posts::create(ctx, title, content, submolt, no_sig),
        Commands::Upvote { post } => commands::posts::upvote(ctx, post),
        Commands::Comment { post, text } => commands::posts::comment(ctx, post, text),
        Commands::Follow { name } => commands::social::follow(ctx, name),
        Commands::Unfollow { name } => commands::social::unfollow(ctx, name),
        Commands::Profile { name } => commands::social::profile(ctx, name),
        Commands::Posts { name, limit } => commands::posts::agent_posts(ctx, name, limit),
        Commands::Notifications { mark_read } => commands::social::notifications(ctx, mark_read),
        Commands::Search { query, limit } => commands::posts::search(ctx, query, limit),
        Commands::Submolts => commands::posts::submolts(ctx),
        Commands::Following => commands::social::following(ctx),
        Commands::Followers => commands::social::followers(ctx),
        Commands::Bookmark { command } => handle_bookmark_command(ctx, command),
        Commands::Draft { command } => handle_draft_command(ctx, command),
        Commands::Digest => commands::digest::digest(ctx),
        Commands::Analyze { name } => commands::digest::analyze(ctx, name),
        Commands::Context => commands::digest::context(ctx),
        Commands::Watch { interval, limit } => commands::watch::watch(ctx, interval, limit),
    }
}

fn handle_bookmark_command(ctx: &Context, command: BookmarkCommands) -> Result<()> {
    match command {
        BookmarkCommands::Add { post, note } => commands::bookmark::add(ctx, post, note),
        BookmarkCommands::Rm { post } => commands::bookmark::remove(ctx, post),
        BookmarkCommands::Ls => commands::bookmark::list(ctx),
        BookmarkCommands::Clear => commands::bookmark::clear(ctx),
    }
}

fn handle_draft_command(ctx: &Context, command: DraftCommands) -> Result<()> {
    match command {
        DraftCommands::New {
            title,
            content,
            submolt,
        } => commands::draft::create(ctx, title, content, submolt),
        DraftCommands::Ls => commands::draft::list(ctx),
        DraftCommands::Show { id } => commands::draft::show(ctx, id),
        DraftCommands::Rm { id } => commands::draft::delete(ctx, id),
        DraftCommands::Publish { id, no_sig } => commands::draft::publish(ctx, id, no_sig),
    }
}

/// Message for a failed command; remote errors that carry their own prefix print as-is
fn format_error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<MoltError>() {
        Some(err @ (MoltError::Connection(_) | MoltError::Rejected(_))) => err.to_string(),
        Some(MoltError::Storage(storage)) => match storage.recovery_suggestion() {
            Some(hint) => format!("Error: {:#}\n{}", e, hint),
            None => format!("Error: {:#}", e),
        },
        _ => format!("Error: {:#}", e),
    }
}

/// Log to stderr when MOLT_LOG is set
fn init_logging() {
    let Ok(log_level) = std::env::var("MOLT_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("molt_core={},molt_cli={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
}
