// Cache store for reading and writing cached data.
// Handles the cached row type, JSON serialization, and atomic file writes.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::error::Result;
use crate::github::Repo;

/// Last known repository list for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRepoList {
    /// Locally generated row identifier. Stable across upserts.
    pub id: Uuid,
    /// Username the row is keyed by.
    pub login: String,
    /// Repositories in the order they were fetched.
    pub repos: Vec<Repo>,
    /// When the repositories were last written.
    pub cached_at: DateTime<Utc>,
}

impl CachedRepoList {
    /// Create a new row with a fresh identifier.
    pub fn new(login: impl Into<String>, repos: Vec<Repo>) -> Self {
        Self {
            id: Uuid::new_v4(),
            login: login.into(),
            repos,
            cached_at: Utc::now(),
        }
    }

    /// Replace the row contents in place, keeping its identifier.
    pub fn replace(&mut self, login: impl Into<String>, repos: Vec<Repo>) {
        self.login = login.into();
        self.repos = repos;
        self.cached_at = Utc::now();
    }
}

/// Read cached JSON data from a file.
pub fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let cached: T = serde_json::from_str(&contents)?;
    Ok(Some(cached))
}

/// Write data to cache as JSON.
pub fn write_cached<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(data)?;

    // Write atomically via a uniquely named temp file in the same directory
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(io::Error::from)?;

    Ok(())
}
