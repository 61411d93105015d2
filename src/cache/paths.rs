// Cache path utilities.
// Constructs filesystem paths for per-user cache entries.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the platform cache directory (~/.cache/dlight on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dlight").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to a user's cache directory.
pub fn user_dir(root: &Path, username: &str) -> PathBuf {
    root.join("users").join(sanitize_name(username))
}

/// Path to a user's cached repository list.
pub fn user_repos_path(root: &Path, username: &str) -> PathBuf {
    user_dir(root, username).join("repos.json")
}

/// Sanitize a name for use as a single path component.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect();

    match sanitized.as_str() {
        "" | "." | ".." => format!("_{}", sanitized),
        _ => sanitized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("octocat"), "octocat");
        assert_eq!(sanitize_name("with/slash"), "with_slash");
        assert_eq!(sanitize_name("owner:name"), "owner_name");
        assert_eq!(sanitize_name(".."), "_..");
        assert_eq!(sanitize_name(""), "_");
    }

    #[test]
    fn test_user_repos_path() {
        let root = Path::new("/tmp/dlight");
        let path = user_repos_path(root, "octocat");
        assert!(path.ends_with("users/octocat/repos.json"));
        assert!(path.starts_with(root));
    }

    #[test]
    fn test_user_dir_stays_under_root() {
        let root = Path::new("/tmp/dlight");
        let dir = user_dir(root, "../../etc");
        assert_eq!(dir, root.join("users").join(".._.._etc"));
    }
}
