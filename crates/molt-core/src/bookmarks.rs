//! Saved posts
//!
//! Bookmarks are kept in insertion order in bookmarks.json. A post is
//! bookmarked at most once: an id matching an existing bookmark by full id
//! or by short id counts as a duplicate.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::cache::PostRefCache;
use crate::error::Result;
use crate::models::Bookmark;
use crate::settings::Settings;
use crate::storage::{load_json, write_json, LoadOutcome};

/// Result of [`BookmarkStore::add`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Bookmark),
    AlreadyBookmarked(Bookmark),
}

pub struct BookmarkStore {
    path: PathBuf,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    pub fn open(settings: &Settings) -> Self {
        Self::load(settings.bookmarks_path())
    }

    /// Load bookmarks from `path`; a missing or corrupt file is an empty list
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let bookmarks = match load_json::<Vec<Bookmark>>(&path) {
            Ok(LoadOutcome::Loaded(bookmarks)) => bookmarks,
            Ok(LoadOutcome::Empty) => Vec::new(),
            Ok(LoadOutcome::Corrupt(details)) => {
                warn!("ignoring corrupt bookmarks file {:?}: {}", path, details);
                Vec::new()
            }
            Err(e) => {
                warn!("ignoring unreadable bookmarks file: {}", e);
                Vec::new()
            }
        };
        Self { path, bookmarks }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        write_json(&self.path, &self.bookmarks)?;
        Ok(())
    }

    /// Bookmark a post
    ///
    /// `id` may be a short id; it is expanded through the cache first.
    pub fn add(
        &mut self,
        id: &str,
        author: &str,
        title: &str,
        note: Option<String>,
        cache: &PostRefCache,
    ) -> Result<AddOutcome> {
        let full_id = cache.resolve(id);

        if let Some(existing) = self.find(&full_id) {
            return Ok(AddOutcome::AlreadyBookmarked(existing.clone()));
        }

        let bookmark = Bookmark::new(full_id, author, title, note);
        self.bookmarks.push(bookmark.clone());
        self.save()?;
        Ok(AddOutcome::Added(bookmark))
    }

    /// Remove the first bookmark matching `id`; `None` if nothing matched
    pub fn remove(&mut self, id: &str) -> Result<Option<Bookmark>> {
        let Some(pos) = self.bookmarks.iter().position(|b| b.matches(id)) else {
            return Ok(None);
        };
        let removed = self.bookmarks.remove(pos);
        self.save()?;
        Ok(Some(removed))
    }

    pub fn find(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.matches(id))
    }

    /// Bookmarks in the order they were saved
    pub fn list(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Remove every bookmark, returning how many there were
    pub fn clear(&mut self) -> Result<usize> {
        let count = self.bookmarks.len();
        self.bookmarks.clear();
        self.save()?;
        Ok(count)
    }
}
