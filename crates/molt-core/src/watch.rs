//! Continuous feed polling
//!
//! The watcher re-reads recent posts on an interval and reports the ones
//! it has not seen before. The first successful poll only seeds the seen
//! set. Each poll records posts into the cache and saves it before
//! returning, so stopping the loop never loses fetched references.
//!
//! Cancellation is cooperative: the flag is checked between polls and
//! during the sleep, never inside a network call.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::api::{FeedSource, Post};
use crate::cache::PostRefCache;

/// Granularity at which a sleeping watcher notices cancellation
const CANCEL_CHECK: Duration = Duration::from_millis(200);

pub struct FeedWatcher {
    sort: String,
    limit: u32,
    seen: HashSet<String>,
    seeded: bool,
}

impl FeedWatcher {
    pub fn new(sort: impl Into<String>, limit: u32) -> Self {
        Self {
            sort: sort.into(),
            limit,
            seen: HashSet::new(),
            seeded: false,
        }
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Fetch once and return posts not seen on an earlier poll
    pub fn poll(&mut self, source: &impl FeedSource, cache: &mut PostRefCache) -> Vec<Post> {
        let Some(posts) = source.recent_posts(&self.sort, self.limit) else {
            debug!("feed poll returned nothing");
            return Vec::new();
        };

        cache.record_posts(&posts);
        if let Err(e) = cache.save() {
            warn!("failed to save post cache: {}", e);
        }

        let fresh: Vec<Post> = posts
            .into_iter()
            .filter(|p| !p.id.is_empty() && self.seen.insert(p.id.clone()))
            .collect();

        if !self.seeded {
            self.seeded = true;
            return Vec::new();
        }
        fresh
    }

    /// Poll every `interval` until `cancel` is set
    pub fn run<F>(
        &mut self,
        source: &impl FeedSource,
        cache: &mut PostRefCache,
        interval: Duration,
        cancel: &AtomicBool,
        mut on_new: F,
    ) where
        F: FnMut(&[Post]),
    {
        while !cancel.load(Ordering::SeqCst) {
            let fresh = self.poll(source, cache);
            if !fresh.is_empty() {
                on_new(&fresh);
            }
            sleep_unless_cancelled(interval, cancel);
        }
        debug!("watcher stopped after seeing {} posts", self.seen.len());
    }
}

fn sleep_unless_cancelled(interval: Duration, cancel: &AtomicBool) {
    let deadline = Instant::now() + interval;
    while !cancel.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep(CANCEL_CHECK.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: format!("title {}", id),
            ..Post::default()
        }
    }

    /// Replays scripted poll results, then cancels the watcher
    struct ScriptedFeed<'a> {
        polls: RefCell<VecDeque<Option<Vec<Post>>>>,
        cancel: &'a AtomicBool,
    }

    impl FeedSource for ScriptedFeed<'_> {
        fn recent_posts(&self, _sort: &str, _limit: u32) -> Option<Vec<Post>> {
            let mut polls = self.polls.borrow_mut();
            let next = polls.pop_front().flatten();
            if polls.is_empty() {
                self.cancel.store(true, Ordering::SeqCst);
            }
            next
        }
    }

    #[test]
    fn test_first_poll_seeds_silently() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = PostRefCache::load(temp_dir.path().join("post_cache.json"));
        let cancel = AtomicBool::new(false);
        let feed = ScriptedFeed {
            polls: RefCell::new(VecDeque::from(vec![
                Some(vec![post("aaaa1111-1"), post("bbbb2222-2")]),
                Some(vec![post("cccc3333-3"), post("aaaa1111-1")]),
            ])),
            cancel: &cancel,
        };

        let mut watcher = FeedWatcher::new("new", 10);
        assert!(watcher.poll(&feed, &mut cache).is_empty());

        let fresh = watcher.poll(&feed, &mut cache);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, "cccc3333-3");
        assert_eq!(watcher.seen_count(), 3);
    }

    #[test]
    fn test_failed_poll_does_not_seed() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = PostRefCache::load(temp_dir.path().join("post_cache.json"));
        let cancel = AtomicBool::new(false);
        let feed = ScriptedFeed {
            polls: RefCell::new(VecDeque::from(vec![
                None,
                Some(vec![post("aaaa1111-1")]),
                Some(vec![post("bbbb2222-2")]),
            ])),
            cancel: &cancel,
        };

        let mut watcher = FeedWatcher::new("new", 10);
        assert!(watcher.poll(&feed, &mut cache).is_empty());
        assert!(watcher.poll(&feed, &mut cache).is_empty());
        assert_eq!(watcher.poll(&feed, &mut cache).len(), 1);
    }

    #[test]
    fn test_run_persists_cache_each_poll_and_stops_on_cancel() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("post_cache.json");
        let mut cache = PostRefCache::load(&cache_path);
        let cancel = AtomicBool::new(false);
        let feed = ScriptedFeed {
            polls: RefCell::new(VecDeque::from(vec![
                Some(vec![post("aaaa1111-1")]),
                Some(vec![post("bbbb2222-2"), post("aaaa1111-1")]),
                Some(vec![post("cccc3333-3")]),
            ])),
            cancel: &cancel,
        };

        let mut reported = Vec::new();
        let mut watcher = FeedWatcher::new("new", 10);
        watcher.run(
            &feed,
            &mut cache,
            Duration::from_millis(1),
            &cancel,
            |posts| reported.extend(posts.iter().map(|p| p.id.clone())),
        );

        assert_eq!(reported, vec!["bbbb2222-2", "cccc3333-3"]);

        let on_disk = PostRefCache::load(&cache_path);
        assert_eq!(on_disk.len(), 3);
        assert_eq!(on_disk.resolve("cccc3333"), "cccc3333-3");
    }

    #[test]
    fn test_cancelled_before_start_does_not_poll() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = PostRefCache::load(temp_dir.path().join("post_cache.json"));
        let cancel = AtomicBool::new(true);
        let feed = ScriptedFeed {
            polls: RefCell::new(VecDeque::from(vec![Some(vec![post("aaaa1111-1")])])),
            cancel: &cancel,
        };

        let mut watcher = FeedWatcher::new("new", 10);
        watcher.run(&feed, &mut cache, Duration::from_secs(60), &cancel, |_| {
            panic!("no posts expected")
        });

        assert_eq!(feed.polls.borrow().len(), 1);
        assert!(cache.is_empty());
    }
}
