//! Core types for semantic-pr

use serde::{Deserialize, Serialize};

/// A commit as returned by the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    /// Commit id (hex sha)
    pub id: String,
    /// Full commit message
    pub message: String,
}

impl RawCommit {
    /// Create a commit from an id and message
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

/// Result of comparing two revisions
///
/// The platform may cap the number of commits it returns; `total_commits`
/// reports how many exist in the range so callers can detect truncation.
#[derive(Debug, Clone, Default)]
pub struct CommitComparison {
    /// Number of commits the platform says are in the range
    pub total_commits: usize,
    /// Commits returned, oldest first
    pub commits: Vec<RawCommit>,
}

impl CommitComparison {
    /// Whether the platform returned fewer commits than exist in the range
    pub const fn is_truncated(&self) -> bool {
        self.total_commits > self.commits.len()
    }
}

/// An open pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Login of the PR author
    pub author: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// Commit the head branch points at
    pub head_sha: String,
    /// Label names currently applied
    pub labels: Vec<String>,
}

/// Outcome of asking the platform to merge one branch into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A merge commit was created
    Merged {
        /// Sha of the merge commit
        sha: String,
    },
    /// Base already contains head
    UpToDate,
    /// The branches conflict; nothing was written
    Conflict,
}

/// Repository coordinates on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl RepoConfig {
    /// Parse an `owner/repo` slug
    pub fn parse(slug: &str, host: Option<String>) -> Option<Self> {
        let (owner, repo) = slug.trim().split_once('/')?;
        let repo = repo.trim_end_matches(".git");
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            host,
        })
    }
}

impl std::fmt::Display for RepoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
