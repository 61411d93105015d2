// GitHub API response types.
// Defines the user, follow, and repository records returned by the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account type discriminator (user, organization, or bot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountType {
    #[default]
    User,
    Organization,
    Bot,
    #[serde(other)]
    Unknown,
}

/// Full GitHub user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub node_id: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub hireable: Option<bool>,
    pub twitter_username: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub site_admin: bool,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    #[serde(default)]
    pub public_gists: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entry in a followers or following list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: u64,
    pub login: String,
    pub node_id: String,
    pub avatar_url: String,
    pub url: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    /// URI template, e.g. `https://api.github.com/users/esin/events{/privacy}`.
    pub events_url: String,
}

/// Account that owns a repository. Referenced by login/id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: u64,
    pub login: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    pub avatar_url: Option<String>,
}

/// Repository summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub html_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
