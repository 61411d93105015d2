// User repository.
// Mediates between the GitHub data source and the local repository cache.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::cache::{FileRepoCache, RepoCache};
use crate::config::Config;
use crate::error::Result;
use crate::github::{Follow, GitHubClient, Repo, User, UserDataSource};
use crate::resource::ResourceStream;

/// Entry point for the presentation layer.
///
/// Every operation returns a [`ResourceStream`] that yields `Loading` and then
/// one terminal value. Only [`UserRepository::repositories`] touches the cache:
/// successful fetches are written through, and failed fetches fall back to the
/// last cached list when one exists.
#[derive(Clone)]
pub struct UserRepository {
    source: Arc<dyn UserDataSource>,
    cache: Arc<dyn RepoCache>,
}

impl UserRepository {
    pub fn new(source: Arc<dyn UserDataSource>, cache: Arc<dyn RepoCache>) -> Self {
        Self { source, cache }
    }

    /// Repository backed by the GitHub API and the on-disk cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = GitHubClient::new(config)?;
        let cache = FileRepoCache::from_config(config)?;
        Ok(Self::new(Arc::new(source), Arc::new(cache)))
    }

    /// Fetch a user's profile.
    pub fn profile(&self, username: &str) -> ResourceStream<User> {
        let source = self.source.clone();
        let username = username.to_string();
        ResourceStream::spawn(async move { source.fetch_profile(&username).await })
    }

    /// Fetch the accounts following a user.
    pub fn followers(&self, username: &str) -> ResourceStream<Vec<Follow>> {
        let source = self.source.clone();
        let username = username.to_string();
        ResourceStream::spawn(async move { source.fetch_followers(&username).await })
    }

    /// Fetch the accounts a user follows.
    pub fn following(&self, username: &str) -> ResourceStream<Vec<Follow>> {
        let source = self.source.clone();
        let username = username.to_string();
        ResourceStream::spawn(async move { source.fetch_following(&username).await })
    }

    /// Fetch a user's repositories, falling back to the cache on failure.
    pub fn repositories(&self, username: &str) -> ResourceStream<Vec<Repo>> {
        let source = self.source.clone();
        let cache = self.cache.clone();
        let username = username.to_string();
        ResourceStream::spawn(async move {
            repositories_with_fallback(source.as_ref(), cache.as_ref(), &username).await
        })
    }
}

#[instrument(skip(source, cache))]
async fn repositories_with_fallback(
    source: &dyn UserDataSource,
    cache: &dyn RepoCache,
    username: &str,
) -> Result<Vec<Repo>> {
    let remote_err = match source.fetch_repositories(username).await {
        Ok(repos) => {
            if let Err(err) = cache.upsert(username, repos.clone()).await {
                warn!(error = %err, "failed to cache repositories");
            } else {
                debug!(count = repos.len(), "cached repositories");
            }
            return Ok(repos);
        }
        Err(err) => err,
    };

    match cache.get(username).await {
        Ok(Some(row)) => {
            info!(error = %remote_err, cached_at = %row.cached_at, "serving cached repositories");
            Ok(row.repos)
        }
        Ok(None) => Err(remote_err),
        Err(cache_err) => {
            warn!(error = %cache_err, "cache lookup failed");
            Err(remote_err)
        }
    }
}
