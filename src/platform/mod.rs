//! Hosting platform services
//!
//! The synchronizer only talks to the platform through these traits, so the
//! same state machine runs against GitHub or an in-memory test double.

mod github;
mod metadata;

pub use github::GitHubService;
pub use metadata::{embed_metadata, extract_metadata, strip_metadata};

use crate::error::Result;
use crate::types::{CommitComparison, MergeOutcome, PullRequest, RawCommit};
use async_trait::async_trait;

/// Page size used when walking commit history
pub const COMMITS_PER_PAGE: usize = 100;

/// Page size used when listing pull requests
pub const PULLS_PER_PAGE: usize = 100;

/// Commit range, ref and merge operations
#[async_trait]
pub trait GitService: Send + Sync {
    /// Compare two revisions.
    ///
    /// Commits are returned oldest first. The platform may truncate the list;
    /// check [`CommitComparison::is_truncated`].
    async fn compare_commits(&self, base: &str, head: &str) -> Result<CommitComparison>;

    /// Resolve a branch or revision to a commit id
    async fn resolve_commit(&self, rev: &str) -> Result<String>;

    /// One page of history reachable from `head`, newest first.
    ///
    /// Pages are 1-based and hold at most [`COMMITS_PER_PAGE`] commits.
    async fn list_commits(&self, head: &str, page: u32) -> Result<Vec<RawCommit>>;

    /// Create a new branch pointing at `sha`
    async fn create_ref(&self, branch: &str, sha: &str) -> Result<()>;

    /// Fast-forward `branch` to `sha`.
    ///
    /// Fails if `sha` does not descend from the branch's current commit.
    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()>;

    /// Merge `head` into `base` with a merge commit
    async fn merge(&self, base: &str, head: &str, message: &str) -> Result<MergeOutcome>;
}

/// Pull request operations
#[async_trait]
pub trait PullRequestService: Send + Sync {
    /// One page of open PRs targeting `base`, most recently created first.
    ///
    /// Pages are 1-based and hold at most [`PULLS_PER_PAGE`] PRs.
    async fn list_open_prs(&self, base: &str, page: u32) -> Result<Vec<PullRequest>>;

    /// Fetch a single PR
    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest>;

    /// Open a new PR
    async fn create_pr(&self, title: &str, head: &str, base: &str, body: &str)
    -> Result<PullRequest>;

    /// Add labels to a PR, keeping existing ones
    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Replace a PR's body and full label set
    async fn update_pr(&self, pr_number: u64, body: &str, labels: &[String]) -> Result<()>;

    /// Post a comment on a PR
    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()>;
}

/// Per-PR key-value store
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Read a value, `None` if it was never set
    async fn get(&self, pr_number: u64, key: &str) -> Result<Option<serde_json::Value>>;

    /// Write a value
    async fn set(&self, pr_number: u64, key: &str, value: serde_json::Value) -> Result<()>;
}
