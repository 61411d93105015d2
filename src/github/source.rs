// Remote data source abstraction.
// One network call per operation; no retries and no caching at this layer.

use async_trait::async_trait;
use tracing::instrument;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{Follow, Repo, User};

/// Source of user data. Implemented by [`GitHubClient`] and by test doubles.
#[async_trait]
pub trait UserDataSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<User>;

    async fn fetch_followers(&self, username: &str) -> Result<Vec<Follow>>;

    async fn fetch_following(&self, username: &str) -> Result<Vec<Follow>>;

    async fn fetch_repositories(&self, username: &str) -> Result<Vec<Repo>>;
}

#[async_trait]
impl UserDataSource for GitHubClient {
    #[instrument(skip(self))]
    async fn fetch_profile(&self, username: &str) -> Result<User> {
        self.get_user(username).await
    }

    #[instrument(skip(self))]
    async fn fetch_followers(&self, username: &str) -> Result<Vec<Follow>> {
        self.get_followers(username).await
    }

    #[instrument(skip(self))]
    async fn fetch_following(&self, username: &str) -> Result<Vec<Follow>> {
        self.get_following(username).await
    }

    #[instrument(skip(self))]
    async fn fetch_repositories(&self, username: &str) -> Result<Vec<Repo>> {
        self.get_user_repos(username).await
    }
}
