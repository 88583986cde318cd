//! Read-only git metadata for a repository under analysis.
//!
//! Analyzer prompts carry the branch, commit and hosting coordinates so the
//! generated documents can reference them. A directory that is not a git
//! repository simply yields no context.

use git2::Repository;
use std::path::Path;
use tracing::debug;

/// Git facts about the analyzed repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoContext {
    pub branch: Option<String>,
    pub commit: Option<String>,
    /// `(owner, name)` parsed from the `origin` remote, when it is on GitHub.
    pub github: Option<(String, String)>,
}

impl RepoContext {
    /// Render as prompt lines; empty when nothing is known.
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        if let Some((owner, name)) = &self.github {
            lines.push(format!("Repository: github.com/{}/{}", owner, name));
        }
        if let Some(branch) = &self.branch {
            lines.push(format!("Branch: {}", branch));
        }
        if let Some(commit) = &self.commit {
            lines.push(format!("Commit: {}", commit));
        }
        lines.join("\n")
    }
}

/// Inspect `path` as a git repository. Returns `None` when it is not one.
pub fn inspect_repository(path: &Path) -> Option<RepoContext> {
    let repo = match Repository::open(path) {
        Ok(repo) => repo,
        Err(e) => {
            debug!("{} is not a git repository: {}", path.display(), e);
            return None;
        }
    };

    let github = repo
        .find_remote("origin")
        .ok()
        .and_then(|remote| remote.url().and_then(parse_github_url));

    Some(RepoContext {
        branch: get_current_branch(&repo),
        commit: get_current_commit(&repo),
        github,
    })
}

/// Parse a GitHub URL to extract owner and repo name.
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let url = url.trim_end_matches(".git");

    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("git@github.com:"))?;

    let parts: Vec<&str> = rest.split('/').collect();
    if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        Some((parts[0].to_string(), parts[1].to_string()))
    } else {
        None
    }
}

/// Get the current branch name of a repository.
fn get_current_branch(repo: &Repository) -> Option<String> {
    repo.head()
        .ok()
        .and_then(|head| head.shorthand().map(String::from))
}

/// Get the current commit hash (short form).
fn get_current_commit(repo: &Repository) -> Option<String> {
    repo.head()
        .ok()
        .and_then(|head| head.peel_to_commit().ok())
        .map(|commit| commit.id().to_string()[..8].to_string())
}
