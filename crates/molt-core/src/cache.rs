//! Short-id resolution cache
//!
//! Posts are displayed by the first eight characters of their id. Every
//! post the tool sees is recorded here so a short id typed back by the
//! user can be expanded to the full id before it reaches the API.
//!
//! The cache is a convenience only. An unreadable or corrupt file loads
//! as an empty cache, and a miss passes the token through untouched for
//! the server to accept or reject.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::api::Post;
use crate::error::Result;
use crate::models::{now_ts, short_id, CacheEntry};
use crate::settings::Settings;
use crate::storage::{load_json, write_json, LoadOutcome};

/// Maximum number of entries kept
pub const CACHE_CAPACITY: usize = 500;

/// Tokens longer than this are taken to be full ids already
const FULL_ID_MIN_LEN: usize = 20;

pub struct PostRefCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl PostRefCache {
    pub fn open(settings: &Settings) -> Self {
        Self::load(settings.cache_path())
    }

    /// Load the cache at `path`, starting empty if it is missing or unusable
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_json::<BTreeMap<String, CacheEntry>>(&path) {
            Ok(LoadOutcome::Loaded(entries)) => entries,
            Ok(LoadOutcome::Empty) => BTreeMap::new(),
            Ok(LoadOutcome::Corrupt(details)) => {
                warn!("ignoring corrupt post cache {:?}: {}", path, details);
                BTreeMap::new()
            }
            Err(e) => {
                warn!("ignoring unreadable post cache: {}", e);
                BTreeMap::new()
            }
        };
        debug!("loaded {} cached post refs", entries.len());
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        write_json(&self.path, &self.entries)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, short: &str) -> Option<&CacheEntry> {
        self.entries.get(short)
    }

    /// Expand a user-supplied post reference to a full id
    ///
    /// Tokens over 20 characters are returned as-is without a lookup.
    /// Unknown short ids are also returned as-is.
    pub fn resolve(&self, token: &str) -> String {
        if token.chars().count() > FULL_ID_MIN_LEN {
            return token.to_string();
        }
        match self.entries.get(token) {
            Some(entry) => {
                debug!("resolved {} -> {}", token, entry.full_id);
                entry.full_id.clone()
            }
            None => token.to_string(),
        }
    }

    /// Remember a post under its short id
    pub fn record(&mut self, full_id: &str, author: Option<&str>) {
        self.record_at(full_id, author, now_ts());
    }

    /// Record every post in a listing
    pub fn record_posts(&mut self, posts: &[Post]) {
        let now = now_ts();
        for post in posts.iter().filter(|p| !p.id.is_empty()) {
            self.record_at(&post.id, post.author_name(), now);
        }
    }

    pub(crate) fn record_at(&mut self, full_id: &str, author: Option<&str>, seen_at: i64) {
        let entry = CacheEntry {
            full_id: full_id.to_string(),
            author: author.map(str::to_string),
            seen_at,
        };
        let key = short_id(full_id).to_string();
        self.entries.insert(key.clone(), entry);
        self.evict(&key);
    }

    /// Keep only the most recently seen entries, always including `keep`
    fn evict(&mut self, keep: &str) {
        if self.entries.len() <= CACHE_CAPACITY {
            return;
        }

        let mut by_age: Vec<(String, i64)> = self
            .entries
            .iter()
            .filter(|(k, _)| k.as_str() != keep)
            .map(|(k, e)| (k.clone(), e.seen_at))
            .collect();
        // Newest first; ties broken by key so the outcome is deterministic
        by_age.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        for (key, _) in by_age.into_iter().skip(CACHE_CAPACITY - 1) {
            self.entries.remove(&key);
        }
    }
}
