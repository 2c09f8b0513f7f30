//! Persisted user configuration
//!
//! `config.json` holds the API key and the post signature. The file is
//! created on first write; until then every field reads as unset.
//!
//! Every accessor re-reads the file, so a value saved earlier in the same
//! invocation is always visible.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MoltError, Result};
use crate::settings::Settings;
use crate::storage::{load_json, write_json, LoadOutcome};

/// Contents of config.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// File-backed access to [`Config`]
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    env_api_key: Option<String>,
}

impl ConfigStore {
    pub fn new(settings: &Settings) -> Self {
        Self {
            path: settings.config_path(),
            env_api_key: settings.env_api_key.clone(),
        }
    }

    /// Store backed by an explicit file, with no environment fallback
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_api_key: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read config.json
    ///
    /// A missing file is an empty config. A file that exists but does not
    /// decode is `ConfigCorrupt`.
    pub fn load(&self) -> Result<Config> {
        match load_json(&self.path)? {
            LoadOutcome::Loaded(config) => Ok(config),
            LoadOutcome::Empty => Ok(Config::default()),
            LoadOutcome::Corrupt(details) => Err(MoltError::ConfigCorrupt {
                path: self.path.clone(),
                details,
            }),
        }
    }

    /// Overwrite config.json, creating the data directory if needed
    pub fn save(&self, config: &Config) -> Result<()> {
        write_json(&self.path, config)?;
        debug!("saved config to {:?}", self.path);
        Ok(())
    }

    /// The stored API key, else the environment key, else `NoApiKey`
    pub fn api_key(&self) -> Result<String> {
        let config = self.load()?;
        config
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| self.env_api_key.clone())
            .ok_or(MoltError::NoApiKey)
    }

    pub fn signature(&self) -> Result<Option<String>> {
        Ok(self.load()?.signature)
    }

    pub fn set_api_key(&self, key: &str) -> Result<()> {
        let mut config = self.load()?;
        config.api_key = Some(key.to_string());
        self.save(&config)
    }

    /// Set the signature; an empty string clears it back to unset
    pub fn set_signature(&self, signature: &str) -> Result<Option<String>> {
        let mut config = self.load()?;
        config.signature = if signature.is_empty() {
            None
        } else {
            Some(signature.to_string())
        };
        self.save(&config)?;
        Ok(config.signature)
    }
}
