// GitHub API endpoint functions.
// Provides typed methods for the user-centric endpoints of the GitHub REST API.

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{Follow, Repo, User};

impl GitHubClient {
    /// Get a user's public profile.
    pub async fn get_user(&self, username: &str) -> Result<User> {
        self.get_json(&["users", username], &[] as &[(&str, &str)])
            .await
    }

    /// Get accounts following a user.
    pub async fn get_followers(&self, username: &str) -> Result<Vec<Follow>> {
        let per_page = self.per_page().to_string();
        let params = [("per_page", per_page.as_str())];
        self.get_json(&["users", username, "followers"], &params)
            .await
    }

    /// Get accounts a user follows.
    pub async fn get_following(&self, username: &str) -> Result<Vec<Follow>> {
        let per_page = self.per_page().to_string();
        let params = [("per_page", per_page.as_str())];
        self.get_json(&["users", username, "following"], &params)
            .await
    }

    /// Get a user's public repositories, most recently updated first.
    pub async fn get_user_repos(&self, username: &str) -> Result<Vec<Repo>> {
        let per_page = self.per_page().to_string();
        let params = [
            ("sort", "updated"),
            ("direction", "desc"),
            ("per_page", per_page.as_str()),
        ];
        self.get_json(&["users", username, "repos"], &params).await
    }
}
