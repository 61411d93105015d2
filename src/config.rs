// Runtime configuration.
// Resolves API endpoint, credentials, timeouts, and cache location from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DlightError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PER_PAGE: u32 = 100;

pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_API_BASE: &str = "DLIGHT_API_BASE";
pub const ENV_CACHE_DIR: &str = "DLIGHT_CACHE_DIR";
pub const ENV_TIMEOUT_SECS: &str = "DLIGHT_TIMEOUT_SECS";

/// Values supplied explicitly by the caller. Each one wins over the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub token: Option<String>,
    pub api_base: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

/// Settings shared by the GitHub client and the repository cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Personal access token. Requests are unauthenticated when absent.
    pub token: Option<String>,
    pub api_base: String,
    /// Explicit cache directory. Falls back to the platform cache dir.
    pub cache_dir: Option<PathBuf>,
    /// Transport timeout applied to every request.
    pub timeout: Duration,
    pub per_page: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            cache_dir: None,
            timeout: DEFAULT_TIMEOUT,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Config {
    /// Build configuration from process environment variables.
    /// Not validated; apply overrides with [`Config::with_overrides`] first.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Config {
            token: non_empty(ENV_TOKEN),
            cache_dir: non_empty(ENV_CACHE_DIR).map(PathBuf::from),
            ..Config::default()
        };

        if let Some(base) = non_empty(ENV_API_BASE) {
            config.api_base = base;
        }

        if let Some(secs) = non_empty(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DlightError::Config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Apply command-line overrides on top of the environment, then validate.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(token) = overrides.token {
            self.token = Some(token);
        }
        if let Some(api_base) = overrides.api_base {
            self.api_base = api_base;
        }
        if let Some(cache_dir) = overrides.cache_dir {
            self.cache_dir = Some(cache_dir);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check invariants that the client relies on.
    pub fn validate(&self) -> Result<()> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(DlightError::Config(format!(
                "API base must be an http(s) URL, got {}",
                self.api_base
            )));
        }
        if self.per_page == 0 || self.per_page > 100 {
            return Err(DlightError::Config("per_page must be between 1 and 100".into()));
        }
        Ok(())
    }

    /// Resolved cache directory, if one can be determined.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(crate::cache::cache_dir)
    }
}
