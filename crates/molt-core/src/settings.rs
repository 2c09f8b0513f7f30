//! Runtime settings
//!
//! Settings are resolved once per invocation from:
//! 1. Default values
//! 2. Environment variables (MOLT_HOME, MOLTBOOK_API_BASE, MOLTBOOK_API_KEY)
//!
//! The resulting value is passed into every store and client constructor,
//! so nothing below the command layer reads the process environment.

use std::path::PathBuf;
use std::time::Duration;

/// Default Moltbook REST endpoint
pub const DEFAULT_API_BASE: &str = "https://www.moltbook.com/api/v1";

/// Public web origin used to render relative post URLs
pub const WEB_BASE: &str = "https://moltbook.com";

/// Seconds a single request may block before it is treated as a transport failure
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the data directory
pub const ENV_HOME: &str = "MOLT_HOME";
/// Environment variable overriding the API base URL
pub const ENV_API_BASE: &str = "MOLTBOOK_API_BASE";
/// Environment variable supplying a fallback API key
pub const ENV_API_KEY: &str = "MOLTBOOK_API_KEY";

/// Per-invocation settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding config.json and the store files
    pub data_dir: PathBuf,
    /// Base URL of the REST API (no trailing slash)
    pub api_base: String,
    /// Transport timeout for every request
    pub timeout: Duration,
    /// API key taken from the environment, used when config.json has none
    pub env_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            env_api_key: None,
        }
    }
}

impl Settings {
    /// Build settings from defaults plus environment overrides
    pub fn load() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides();
        settings
    }

    /// Settings rooted at a specific directory (tests, alternate profiles)
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(ENV_HOME) {
            if !val.is_empty() {
                self.data_dir = PathBuf::from(val);
            }
        }

        if let Ok(val) = std::env::var(ENV_API_BASE) {
            if !val.is_empty() {
                self.api_base = val.trim_end_matches('/').to_string();
            }
        }

        self.env_api_key = std::env::var(ENV_API_KEY).ok().filter(|v| !v.is_empty());
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("post_cache.json")
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        self.data_dir.join("bookmarks.json")
    }

    pub fn drafts_path(&self) -> PathBuf {
        self.data_dir.join("drafts.json")
    }
}

/// `~/.molt`, or `./.molt` when no home directory can be determined
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".molt")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Serializes every test in the crate that touches environment variables
    pub(crate) static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Locks env access, clears the given vars, and restores them on drop
    pub(crate) struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        pub(crate) fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    pub(crate) const ENV_VARS: &[&str] = &[ENV_HOME, ENV_API_BASE, ENV_API_KEY];

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.data_dir.ends_with(".molt"));
        assert!(settings.env_api_key.is_none());
    }

    #[test]
    fn test_file_paths() {
        let settings = Settings::with_data_dir("/tmp/molt");
        assert_eq!(settings.config_path(), PathBuf::from("/tmp/molt/config.json"));
        assert!(settings.cache_path().ends_with("post_cache.json"));
        assert!(settings.bookmarks_path().ends_with("bookmarks.json"));
        assert!(settings.drafts_path().ends_with("drafts.json"));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var(ENV_HOME, "/tmp/molt-env");
        env::set_var(ENV_API_BASE, "http://localhost:8080/api/");
        env::set_var(ENV_API_KEY, "moltbook_sk_env");

        let settings = Settings::load();
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/molt-env"));
        assert_eq!(settings.api_base, "http://localhost:8080/api");
        assert_eq!(settings.env_api_key.as_deref(), Some("moltbook_sk_env"));
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var(ENV_HOME, "");
        env::set_var(ENV_API_KEY, "");

        let settings = Settings::load();
        assert!(settings.data_dir.ends_with(".molt"));
        assert!(settings.env_api_key.is_none());
    }

    #[test]
    fn test_with_api_base_trims_slash() {
        let settings = Settings::default().with_api_base("http://127.0.0.1:9/");
        assert_eq!(settings.api_base, "http://127.0.0.1:9");
    }
}
