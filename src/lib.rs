// dlight library.
// GitHub user data with a cache-backed repository layer and Loading/Success/Error streams.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod repository;
pub mod resource;

pub use cache::{CachedRepoList, FileRepoCache, MemoryRepoCache, RepoCache};
pub use config::Config;
pub use error::{DlightError, Result};
pub use github::{Follow, GitHubClient, Owner, Repo, User, UserDataSource};
pub use repository::UserRepository;
pub use resource::{Resource, ResourceStream};
