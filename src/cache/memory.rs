// In-memory repository cache.
// Used when persistence is disabled and as a per-test cache double.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::Result;
use crate::github::Repo;

use super::store::CachedRepoList;
use super::{RepoCache, cache_key};

/// Repository cache held in a keyed map.
#[derive(Debug, Default)]
pub struct MemoryRepoCache {
    rows: Mutex<HashMap<String, CachedRepoList>>,
}

impl MemoryRepoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with `(username, repos)` rows.
    pub fn with_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Repo>)>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|(login, repos)| {
                let row = CachedRepoList::new(login, repos);
                (cache_key(&row.login), row)
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Number of cached rows.
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RepoCache for MemoryRepoCache {
    async fn get(&self, username: &str) -> Result<Option<CachedRepoList>> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.get(&cache_key(username)).cloned())
    }

    async fn upsert(&self, username: &str, repos: Vec<Repo>) -> Result<()> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        match rows.entry(cache_key(username)) {
            Entry::Occupied(mut entry) => entry.get_mut().replace(username, repos),
            Entry::Vacant(entry) => {
                entry.insert(CachedRepoList::new(username, repos));
            }
        }
        Ok(())
    }
}
