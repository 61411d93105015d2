// Cache module for the local repository cache.
// Keeps the last fetched repository list per user for offline fallback.

use async_trait::async_trait;

use crate::error::Result;
use crate::github::Repo;

pub mod file;
pub mod locks;
pub mod memory;
pub mod paths;
pub mod store;

pub use file::FileRepoCache;
pub use memory::MemoryRepoCache;
pub use paths::cache_dir;
pub use store::CachedRepoList;

/// Keyed store of repository lists, at most one row per username.
#[async_trait]
pub trait RepoCache: Send + Sync {
    /// Look up the row for `username`.
    async fn get(&self, username: &str) -> Result<Option<CachedRepoList>>;

    /// Insert a row for `username`, or replace the existing row's repositories.
    /// Concurrent upserts for one username are serialized; the last one wins.
    async fn upsert(&self, username: &str, repos: Vec<Repo>) -> Result<()>;
}

/// Normalized cache key. GitHub logins are case-insensitive.
pub fn cache_key(username: &str) -> String {
    username.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("Octocat"), "octocat");
        assert_eq!(cache_key(" octocat "), "octocat");
    }
}
