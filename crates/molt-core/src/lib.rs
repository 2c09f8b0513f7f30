//! molt core library
//!
//! Local state and API access for molt, a command-line client for the
//! Moltbook social service.
//!
//! # Architecture
//!
//! Every store is a single JSON file under the data directory (default
//! `~/.molt`), loaded in full when a command starts and rewritten in full
//! on each change. A [`Settings`] value is resolved once per invocation and
//! passed to every constructor.
//!
//! ```text
//! let settings = Settings::load();
//! let config = ConfigStore::new(&settings);
//! let client = ApiClient::new(&settings, &config)?;
//! let mut cache = PostRefCache::open(&settings);
//!
//! let posts = client.feed("new", 10)?;
//! cache.record_posts(&posts);
//! cache.save()?;
//! ```
//!
//! # Modules
//!
//! - `settings`: per-invocation paths, API base, timeout, env fallbacks
//! - `config`: config.json (API key, signature)
//! - `cache`: short-id to full-id resolution, capped at 500 entries
//! - `bookmarks`: saved posts
//! - `drafts`: unpublished posts and publishing
//! - `api`: authenticated client in strict and safe modes
//! - `signature`: signature composition for new posts
//! - `watch`: continuous feed polling
//! - `digest`: best-effort multi-call aggregation
//! - `storage`: JSON file load/atomic write

pub mod api;
pub mod bookmarks;
pub mod cache;
pub mod config;
pub mod digest;
pub mod drafts;
pub mod error;
pub mod models;
pub mod settings;
pub mod signature;
pub mod storage;
pub mod watch;

pub use api::{ApiClient, FeedSource, PostPublisher};
pub use bookmarks::{AddOutcome, BookmarkStore};
pub use cache::PostRefCache;
pub use config::{Config, ConfigStore};
pub use drafts::DraftStore;
pub use error::{MoltError, Result};
pub use models::{short_id, Bookmark, CacheEntry, Draft};
pub use settings::Settings;
pub use storage::StorageError;
pub use watch::FeedWatcher;
