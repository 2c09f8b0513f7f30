//! Unpublished posts
//!
//! Drafts live only in drafts.json until they are published. Publishing
//! submits the draft and removes it locally only after the server accepts
//! it, so a failed publish leaves the draft where it was.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::api::{NewPost, PostPublisher, PublishedPost};
use crate::config::ConfigStore;
use crate::error::{MoltError, Result};
use crate::models::Draft;
use crate::settings::Settings;
use crate::signature::append_signature;
use crate::storage::{load_json, write_json, LoadOutcome};

pub struct DraftStore {
    path: PathBuf,
    drafts: Vec<Draft>,
}

impl DraftStore {
    pub fn open(settings: &Settings) -> Self {
        Self::load(settings.drafts_path())
    }

    /// Load drafts from `path`; a missing or corrupt file is an empty list
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let drafts = match load_json::<Vec<Draft>>(&path) {
            Ok(LoadOutcome::Loaded(drafts)) => drafts,
            Ok(LoadOutcome::Empty) => Vec::new(),
            Ok(LoadOutcome::Corrupt(details)) => {
                warn!("ignoring corrupt drafts file {:?}: {}", path, details);
                Vec::new()
            }
            Err(e) => {
                warn!("ignoring unreadable drafts file: {}", e);
                Vec::new()
            }
        };
        Self { path, drafts }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        write_json(&self.path, &self.drafts)?;
        Ok(())
    }

    /// Create and store a new draft
    pub fn create(&mut self, title: &str, content: &str, submolt: &str) -> Result<Draft> {
        let draft = Draft::new(title, content, submolt);
        self.drafts.push(draft.clone());
        self.save()?;
        Ok(draft)
    }

    pub fn find(&self, draft_id: &str) -> Option<&Draft> {
        self.drafts.iter().find(|d| d.id == draft_id)
    }

    /// Drafts in creation order
    pub fn list(&self) -> &[Draft] {
        &self.drafts
    }

    /// Remove a draft; true iff it existed
    pub fn delete(&mut self, draft_id: &str) -> Result<bool> {
        let before = self.drafts.len();
        self.drafts.retain(|d| d.id != draft_id);
        if self.drafts.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Submit a draft as a post, then delete it
    ///
    /// With `with_signature`, the configured signature is appended to the
    /// content before submission.
    pub fn publish(
        &mut self,
        draft_id: &str,
        publisher: &impl PostPublisher,
        config: &ConfigStore,
        with_signature: bool,
    ) -> Result<PublishedPost> {
        let draft = self
            .find(draft_id)
            .cloned()
            .ok_or_else(|| MoltError::DraftNotFound(draft_id.to_string()))?;

        let content = if with_signature {
            append_signature(&draft.content, config.signature()?.as_deref())
        } else {
            draft.content.clone()
        };

        let published = publisher.publish(&NewPost {
            title: draft.title.clone(),
            content,
            submolt: draft.submolt.clone(),
        })?;

        self.delete(&draft.id)?;
        info!("published draft {} as {}", draft.id, published.id);
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Records submitted posts; fails every call when `fail` is set
    struct FakePublisher {
        fail: bool,
        submitted: RefCell<Vec<NewPost>>,
    }

    impl FakePublisher {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                submitted: RefCell::new(Vec::new()),
            }
        }
    }

    impl PostPublisher for FakePublisher {
        fn publish(&self, post: &NewPost) -> Result<PublishedPost> {
            self.submitted.borrow_mut().push(post.clone());
            if self.fail {
                return Err(MoltError::Connection("connection refused".into()));
            }
            Ok(PublishedPost::new("0123abcd-remote", "/post/0123abcd-remote"))
        }
    }

    struct Fixture {
        _temp_dir: TempDir,
        store: DraftStore,
        config: ConfigStore,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::with_data_dir(temp_dir.path());
        Fixture {
            store: DraftStore::open(&settings),
            config: ConfigStore::new(&settings),
            _temp_dir: temp_dir,
        }
    }

    #[test]
    fn test_create_and_find() {
        let mut f = fixture();
        let draft = f.store.create("Title", "Body", "general").unwrap();

        let found = f.store.find(&draft.id).unwrap();
        assert_eq!(found.title, "Title");
        assert_eq!(found.submolt, "general");

        let reloaded = DraftStore::load(f.store.path());
        assert_eq!(reloaded.list().len(), 1);
    }

    #[test]
    fn test_delete_then_find() {
        let mut f = fixture();
        let draft = f.store.create("Title", "Body", "general").unwrap();

        assert!(f.store.delete(&draft.id).unwrap());
        assert!(f.store.find(&draft.id).is_none());
        assert!(!f.store.delete(&draft.id).unwrap());
    }

    #[test]
    fn test_publish_success_removes_draft() {
        let mut f = fixture();
        let draft = f.store.create("Title", "Body", "general").unwrap();
        let publisher = FakePublisher::new(false);

        let published = f
            .store
            .publish(&draft.id, &publisher, &f.config, true)
            .unwrap();

        assert_eq!(published.id, "0123abcd-remote");
        assert!(f.store.find(&draft.id).is_none());
        assert!(DraftStore::load(f.store.path()).list().is_empty());
    }

    #[test]
    fn test_publish_failure_keeps_draft() {
        let mut f = fixture();
        let draft = f.store.create("Title", "Body", "general").unwrap();
        let publisher = FakePublisher::new(true);

        let err = f
            .store
            .publish(&draft.id, &publisher, &f.config, true)
            .unwrap_err();

        assert!(matches!(err, MoltError::Connection(_)));
        assert!(f.store.find(&draft.id).is_some());
        assert_eq!(DraftStore::load(f.store.path()).list().len(), 1);
    }

    #[test]
    fn test_publish_unknown_draft() {
        let mut f = fixture();
        let publisher = FakePublisher::new(false);

        let err = f
            .store
            .publish("missing1", &publisher, &f.config, false)
            .unwrap_err();
        assert!(matches!(err, MoltError::DraftNotFound(ref id) if id == "missing1"));
        assert!(publisher.submitted.borrow().is_empty());
    }

    #[test]
    fn test_publish_appends_signature_when_asked() {
        let mut f = fixture();
        f.config.set_signature("via molt").unwrap();
        let publisher = FakePublisher::new(false);

        let signed = f.store.create("A", "Body", "general").unwrap();
        f.store.publish(&signed.id, &publisher, &f.config, true).unwrap();

        let unsigned = f.store.create("B", "Body", "general").unwrap();
        f.store.publish(&unsigned.id, &publisher, &f.config, false).unwrap();

        let submitted = publisher.submitted.borrow();
        assert_eq!(submitted[0].content, "Body\n\n---\nvia molt");
        assert_eq!(submitted[1].content, "Body");
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("drafts.json");
        fs::write(&path, "not json at all").unwrap();

        let mut store = DraftStore::load(&path);
        assert!(store.list().is_empty());

        store.create("T", "C", "general").unwrap();
        assert_eq!(DraftStore::load(&path).list().len(), 1);
    }
}
