// GitHub API module.
// Provides the client, data source trait, and types for the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod source;
pub mod types;

pub use client::GitHubClient;
pub use source::UserDataSource;
pub use types::*;
