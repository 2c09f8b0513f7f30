//! Command handlers
//!
//! Every handler receives a [`Context`] built once in `main`. Handlers that
//! talk to Moltbook build the client through [`Context::client`], which is
//! where a missing API key surfaces.

pub mod account;
pub mod bookmark;
pub mod digest;
pub mod draft;
pub mod posts;
pub mod social;
pub mod watch;

use anyhow::Result;
use tracing::warn;

use molt_core::api::ActionResponse;
use molt_core::{ApiClient, ConfigStore, PostRefCache, Settings};

use crate::output::Output;

/// Per-invocation state shared by all handlers
pub struct Context {
    pub settings: Settings,
    pub config: ConfigStore,
    pub output: Output,
}

impl Context {
    pub fn new(settings: Settings, output: Output) -> Self {
        let config = ConfigStore::new(&settings);
        Self {
            settings,
            config,
            output,
        }
    }

    /// Authenticated client; fails with `NoApiKey` when no key is configured
    pub fn client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.settings, &self.config)?)
    }

    pub fn cache(&self) -> PostRefCache {
        PostRefCache::open(&self.settings)
    }
}

/// Persist the post cache; failure only costs future short-id lookups
pub(crate) fn save_cache(cache: &PostRefCache) {
    if let Err(e) = cache.save() {
        warn!("failed to save post cache: {}", e);
    }
}

/// Report a `{success, message, error}` response
pub(crate) fn report_action(resp: &ActionResponse, fallback: &str, output: &Output) {
    if resp.success {
        let message = if resp.message.is_empty() {
            fallback
        } else {
            resp.message.as_str()
        };
        output.success(message);
    } else {
        output.failure(&resp.error);
    }
}
