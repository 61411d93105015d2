#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dlight::github::AccountType;
use dlight::{
    CachedRepoList, DlightError, Follow, Owner, Repo, RepoCache, Result, User, UserDataSource,
};
use tokio::sync::Mutex;

/// Kind of failure a fake source should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    NotFound,
    RateLimited,
    Transport,
    Malformed,
}

impl Failure {
    pub fn to_error(self, username: &str) -> DlightError {
        match self {
            Failure::NotFound => DlightError::NotFound(format!("user {}", username)),
            Failure::RateLimited => DlightError::RateLimited {
                reset_at: "12:00:00".to_string(),
            },
            Failure::Transport => DlightError::Transport(transport_error()),
            Failure::Malformed => DlightError::Malformed("expected value at line 1".to_string()),
        }
    }
}

/// A real `reqwest::Error`, produced without touching the network.
pub fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err()
}

/// Data source double. State is injected per test.
#[derive(Clone, Default)]
pub struct FakeSource {
    pub user: Option<User>,
    pub followers: Vec<Follow>,
    pub following: Vec<Follow>,
    pub repos: Vec<Repo>,
    pub failure: Option<Failure>,
    pub delay: Option<Duration>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn with_repos(repos: Vec<Repo>) -> Self {
        Self {
            repos,
            ..Default::default()
        }
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn respond<T: Clone + Send + Sync>(&self, username: &str, value: &T) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure {
            Some(failure) => Err(failure.to_error(username)),
            None => Ok(value.clone()),
        }
    }
}

#[async_trait]
impl UserDataSource for FakeSource {
    async fn fetch_profile(&self, username: &str) -> Result<User> {
        match &self.user {
            Some(user) if user.login == username => self.respond(username, user).await,
            _ => {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err(self
                    .failure
                    .unwrap_or(Failure::NotFound)
                    .to_error(username))
            }
        }
    }

    async fn fetch_followers(&self, username: &str) -> Result<Vec<Follow>> {
        self.respond(username, &self.followers).await
    }

    async fn fetch_following(&self, username: &str) -> Result<Vec<Follow>> {
        self.respond(username, &self.following).await
    }

    async fn fetch_repositories(&self, username: &str) -> Result<Vec<Repo>> {
        self.respond(username, &self.repos).await
    }
}

/// Cache double whose reads and writes can be made to fail.
#[derive(Default)]
pub struct FlakyCache {
    pub rows: Mutex<Vec<CachedRepoList>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

#[async_trait]
impl RepoCache for FlakyCache {
    async fn get(&self, username: &str) -> Result<Option<CachedRepoList>> {
        if self.fail_reads {
            return Err(DlightError::CacheUnavailable("disk I/O error".into()));
        }
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|row| row.login == username).cloned())
    }

    async fn upsert(&self, username: &str, repos: Vec<Repo>) -> Result<()> {
        if self.fail_writes {
            return Err(DlightError::CacheUnavailable("read-only filesystem".into()));
        }
        let mut rows = self.rows.lock().await;
        match rows.iter_mut().find(|row| row.login == username) {
            Some(row) => row.replace(username, repos),
            None => rows.push(CachedRepoList::new(username, repos)),
        }
        Ok(())
    }
}

pub fn repo(name: &str, stars: u64) -> Repo {
    Repo {
        id: 1296269,
        name: name.to_string(),
        full_name: format!("octocat/{}", name),
        owner: Owner {
            id: 583231,
            login: "octocat".to_string(),
            account_type: AccountType::User,
            avatar_url: Some("https://avatars.githubusercontent.com/u/583231?v=4".to_string()),
        },
        description: Some("My first repository on GitHub!".to_string()),
        language: None,
        stargazers_count: stars,
        open_issues_count: 0,
        forks_count: 0,
        html_url: Some(format!("https://github.com/octocat/{}", name)),
        updated_at: Utc.with_ymd_and_hms(2024, 1, 22, 12, 0, 0).unwrap(),
    }
}

pub fn follow(login: &str, id: u64, account_type: AccountType) -> Follow {
    Follow {
        id,
        login: login.to_string(),
        node_id: format!("MDQ6VXNlcj{}", id),
        avatar_url: format!("https://avatars.githubusercontent.com/u/{}?v=4", id),
        url: format!("https://api.github.com/users/{}", login),
        html_url: Some(format!("https://github.com/{}", login)),
        account_type,
        events_url: format!("https://api.github.com/users/{}/events{{/privacy}}", login),
    }
}

pub fn user(login: &str) -> User {
    User {
        id: 50293753,
        login: login.to_string(),
        node_id: "MDQ6VXNlcjUwMjkzNzUz".to_string(),
        name: Some("Joel Kanyi".to_string()),
        bio: Some("bio".to_string()),
        company: None,
        blog: Some("blog".to_string()),
        location: None,
        email: None,
        hireable: Some(true),
        twitter_username: None,
        avatar_url: "https://avatars.githubusercontent.com/u/50293753?v=4".to_string(),
        html_url: format!("https://github.com/{}", login),
        account_type: AccountType::User,
        site_admin: false,
        followers: 0,
        following: 0,
        public_repos: 30,
        public_gists: 2,
        created_at: Utc.with_ymd_and_hms(2019, 5, 5, 10, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2022, 3, 1, 8, 30, 0).unwrap(),
    }
}
