// Filesystem-backed repository cache.
// Stores one JSON file per user under the cache directory.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::{DlightError, Result};
use crate::github::Repo;

use super::locks::KeyedLocks;
use super::store::{self, CachedRepoList};
use super::{RepoCache, cache_key, paths};

/// Repository cache persisted as JSON files.
#[derive(Debug)]
pub struct FileRepoCache {
    root: PathBuf,
    locks: KeyedLocks,
}

impl FileRepoCache {
    /// Create a cache rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: KeyedLocks::new(),
        }
    }

    /// Create a cache at the configured or platform cache directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        config
            .cache_dir()
            .map(Self::new)
            .ok_or_else(|| DlightError::Config("no cache directory available".into()))
    }
}

#[async_trait]
impl RepoCache for FileRepoCache {
    #[instrument(skip(self))]
    async fn get(&self, username: &str) -> Result<Option<CachedRepoList>> {
        // Writes land via rename, so readers never see a partial file.
        let path = paths::user_repos_path(&self.root, &cache_key(username));
        run_blocking(move || store::read_cached(&path)).await
    }

    #[instrument(skip(self, repos), fields(count = repos.len()))]
    async fn upsert(&self, username: &str, repos: Vec<Repo>) -> Result<()> {
        let key = cache_key(username);
        let guard = self.locks.lock(&key).await;

        let path = paths::user_repos_path(&self.root, &key);
        let login = username.to_string();
        // The guard moves into the blocking closure: an abandoned upsert keeps
        // the key locked until its rename has landed.
        run_blocking(move || {
            let _guard = guard;
            let row = match store::read_cached::<CachedRepoList>(&path) {
                Ok(Some(mut existing)) => {
                    existing.replace(login, repos);
                    existing
                }
                Ok(None) => CachedRepoList::new(login, repos),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "replacing unreadable cache entry");
                    CachedRepoList::new(login, repos)
                }
            };
            store::write_cached(&path, &row)?;
            debug!(path = %path.display(), id = %row.id, "cache entry written");
            Ok(())
        })
        .await
    }
}

/// Run blocking filesystem work off the async executor.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| DlightError::CacheUnavailable(e.to_string()))?
        .map_err(|e| DlightError::CacheUnavailable(e.to_string()))
}
