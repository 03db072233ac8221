//! Mock platform for testing
//!
//! In-memory implementation of all three provider traits. Every call is
//! appended to a single ordered log so tests can assert on sequencing as
//! well as counts.

#![allow(dead_code)]

use async_trait::async_trait;
use semantic_pr::error::{Error, Result};
use semantic_pr::platform::{GitService, MetadataStore, PULLS_PER_PAGE, PullRequestService};
use semantic_pr::types::{CommitComparison, MergeOutcome, PullRequest, RawCommit};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Login the mock gives to PRs it creates
pub const BOT: &str = "semantic-pr[bot]";

/// One recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CompareCommits { base: String, head: String },
    ResolveCommit(String),
    ListCommits { head: String, page: u32 },
    CreateRef { branch: String, sha: String },
    UpdateRef { branch: String, sha: String },
    Merge { base: String, head: String, message: String },
    ListOpenPrs { base: String, page: u32 },
    GetPr(u64),
    CreatePr { title: String, head: String, base: String, body: String },
    AddLabels { pr_number: u64, labels: Vec<String> },
    UpdatePr { pr_number: u64, body: String, labels: Vec<String> },
    CreateComment { pr_number: u64, body: String },
    GetMetadata { pr_number: u64, key: String },
    SetMetadata { pr_number: u64, key: String, value: Value },
}

/// In-memory platform
///
/// Features:
/// - Open PR list with real pagination, newest first like GitHub's default
/// - Auto-incrementing PR numbers
/// - Configurable compare results, history pages and merge outcome
/// - Error injection for fast-forward, merge, PR listing, comments and updates
pub struct MockPlatform {
    next_pr_number: AtomicU64,
    open_prs: Mutex<Vec<PullRequest>>,
    // Compare results keyed by (base, head); `range_commits` answers the rest
    comparisons: Mutex<HashMap<(String, String), CommitComparison>>,
    range_commits: Mutex<Vec<RawCommit>>,
    resolved: Mutex<HashMap<String, String>>,
    // Full history per head, newest first
    history: Mutex<HashMap<String, Vec<RawCommit>>>,
    merge_outcome: Mutex<MergeOutcome>,
    metadata: Mutex<HashMap<(u64, String), Value>>,
    // PR that shows up as soon as a release branch is created
    racing_pr: Mutex<Option<PullRequest>>,
    // Error injection
    error_on_update_ref: Mutex<Option<String>>,
    error_on_merge: Mutex<Option<String>>,
    error_on_list_prs: Mutex<Option<String>>,
    error_on_comment: Mutex<Option<String>>,
    error_on_update_pr: Mutex<Option<String>>,
    calls: Mutex<Vec<Call>>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatform {
    /// Create an empty mock: no PRs, empty ranges, merges succeed
    pub fn new() -> Self {
        Self {
            next_pr_number: AtomicU64::new(1),
            open_prs: Mutex::new(Vec::new()),
            comparisons: Mutex::new(HashMap::new()),
            range_commits: Mutex::new(Vec::new()),
            resolved: Mutex::new(HashMap::new()),
            history: Mutex::new(HashMap::new()),
            merge_outcome: Mutex::new(MergeOutcome::Merged {
                sha: "merge-sha".to_string(),
            }),
            metadata: Mutex::new(HashMap::new()),
            racing_pr: Mutex::new(None),
            error_on_update_ref: Mutex::new(None),
            error_on_merge: Mutex::new(None),
            error_on_list_prs: Mutex::new(None),
            error_on_comment: Mutex::new(None),
            error_on_update_pr: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    // === Setup ===

    /// Add an open PR
    pub fn add_open_pr(&self, pr: PullRequest) {
        let next = self.next_pr_number.load(Ordering::SeqCst).max(pr.number + 1);
        self.next_pr_number.store(next, Ordering::SeqCst);
        self.open_prs.lock().unwrap().push(pr);
    }

    /// Commits every compare returns unless a specific range is configured
    pub fn set_range_commits(&self, commits: Vec<RawCommit>) {
        *self.range_commits.lock().unwrap() = commits;
    }

    /// Compare result for one specific range
    pub fn set_comparison(&self, base: &str, head: &str, comparison: CommitComparison) {
        self.comparisons
            .lock()
            .unwrap()
            .insert((base.to_string(), head.to_string()), comparison);
    }

    /// Commit id a revision resolves to
    pub fn set_resolved(&self, rev: &str, sha: &str) {
        self.resolved
            .lock()
            .unwrap()
            .insert(rev.to_string(), sha.to_string());
    }

    /// History reachable from `head`, newest first
    pub fn set_history(&self, head: &str, commits: Vec<RawCommit>) {
        self.history
            .lock()
            .unwrap()
            .insert(head.to_string(), commits);
    }

    /// Outcome of every merge call
    pub fn set_merge_outcome(&self, outcome: MergeOutcome) {
        *self.merge_outcome.lock().unwrap() = outcome;
    }

    /// Pre-set a metadata value
    pub fn set_metadata(&self, pr_number: u64, key: &str, value: Value) {
        self.metadata
            .lock()
            .unwrap()
            .insert((pr_number, key.to_string()), value);
    }

    /// Make `pr` appear in the open list when a branch is created
    pub fn race_with(&self, pr: PullRequest) {
        *self.racing_pr.lock().unwrap() = Some(pr);
    }

    /// Make `update_ref` fail (fast-forward rejected)
    pub fn fail_update_ref(&self, msg: &str) {
        *self.error_on_update_ref.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge` fail outright (not a conflict)
    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_open_prs` fail
    pub fn fail_list_prs(&self, msg: &str) {
        *self.error_on_list_prs.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_comment` fail
    pub fn fail_comment(&self, msg: &str) {
        *self.error_on_comment.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_pr` fail
    pub fn fail_update_pr(&self, msg: &str) {
        *self.error_on_update_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Inspection ===

    /// Every call in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls matching `pred`
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    /// Current metadata value
    pub fn metadata_value(&self, pr_number: u64, key: &str) -> Option<Value> {
        self.metadata
            .lock()
            .unwrap()
            .get(&(pr_number, key.to_string()))
            .cloned()
    }

    /// Currently open PRs
    pub fn open_prs(&self) -> Vec<PullRequest> {
        self.open_prs.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GitService for MockPlatform {
    async fn compare_commits(&self, base: &str, head: &str) -> Result<CommitComparison> {
        self.record(Call::CompareCommits {
            base: base.to_string(),
            head: head.to_string(),
        });

        let key = (base.to_string(), head.to_string());
        if let Some(comparison) = self.comparisons.lock().unwrap().get(&key) {
            return Ok(comparison.clone());
        }
        let commits = self.range_commits.lock().unwrap().clone();
        Ok(CommitComparison {
            total_commits: commits.len(),
            commits,
        })
    }

    async fn resolve_commit(&self, rev: &str) -> Result<String> {
        self.record(Call::ResolveCommit(rev.to_string()));
        self.resolved
            .lock()
            .unwrap()
            .get(rev)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("resolve_commit: unknown revision {rev}")))
    }

    async fn list_commits(&self, head: &str, page: u32) -> Result<Vec<RawCommit>> {
        self.record(Call::ListCommits {
            head: head.to_string(),
            page,
        });

        let history = self.history.lock().unwrap();
        let all = history.get(head).cloned().unwrap_or_default();
        let start = (page as usize - 1) * semantic_pr::platform::COMMITS_PER_PAGE;
        Ok(all
            .into_iter()
            .skip(start)
            .take(semantic_pr::platform::COMMITS_PER_PAGE)
            .collect())
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        self.record(Call::CreateRef {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });

        if let Some(pr) = self.racing_pr.lock().unwrap().take() {
            self.open_prs.lock().unwrap().push(pr);
        }
        Ok(())
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()> {
        self.record(Call::UpdateRef {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });

        if let Some(msg) = self.error_on_update_ref.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    async fn merge(&self, base: &str, head: &str, message: &str) -> Result<MergeOutcome> {
        self.record(Call::Merge {
            base: base.to_string(),
            head: head.to_string(),
            message: message.to_string(),
        });

        if let Some(msg) = self.error_on_merge.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self.merge_outcome.lock().unwrap().clone())
    }
}

#[async_trait]
impl PullRequestService for MockPlatform {
    async fn list_open_prs(&self, base: &str, page: u32) -> Result<Vec<PullRequest>> {
        self.record(Call::ListOpenPrs {
            base: base.to_string(),
            page,
        });

        if let Some(msg) = self.error_on_list_prs.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        // Insertion order stands in for creation order
        let start = (page as usize - 1) * PULLS_PER_PAGE;
        Ok(self
            .open_prs
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|pr| pr.base_ref == base)
            .skip(start)
            .take(PULLS_PER_PAGE)
            .cloned()
            .collect())
    }

    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest> {
        self.record(Call::GetPr(pr_number));
        self.open_prs
            .lock()
            .unwrap()
            .iter()
            .find(|pr| pr.number == pr_number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("get_pr: no PR #{pr_number}")))
    }

    async fn create_pr(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.record(Call::CreatePr {
            title: title.to_string(),
            head: head.to_string(),
            base: base.to_string(),
            body: body.to_string(),
        });

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            number,
            author: BOT.to_string(),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            head_sha: String::new(),
            labels: Vec::new(),
        };
        self.open_prs.lock().unwrap().push(pr.clone());
        Ok(pr)
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.record(Call::AddLabels {
            pr_number,
            labels: labels.to_vec(),
        });

        if let Some(pr) = self
            .open_prs
            .lock()
            .unwrap()
            .iter_mut()
            .find(|pr| pr.number == pr_number)
        {
            for label in labels {
                if !pr.labels.contains(label) {
                    pr.labels.push(label.clone());
                }
            }
        }
        Ok(())
    }

    async fn update_pr(&self, pr_number: u64, body: &str, labels: &[String]) -> Result<()> {
        self.record(Call::UpdatePr {
            pr_number,
            body: body.to_string(),
            labels: labels.to_vec(),
        });

        if let Some(msg) = self.error_on_update_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        if let Some(pr) = self
            .open_prs
            .lock()
            .unwrap()
            .iter_mut()
            .find(|pr| pr.number == pr_number)
        {
            pr.labels = labels.to_vec();
        }
        Ok(())
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.record(Call::CreateComment {
            pr_number,
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_comment.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for MockPlatform {
    async fn get(&self, pr_number: u64, key: &str) -> Result<Option<Value>> {
        self.record(Call::GetMetadata {
            pr_number,
            key: key.to_string(),
        });
        Ok(self.metadata_value(pr_number, key))
    }

    async fn set(&self, pr_number: u64, key: &str, value: Value) -> Result<()> {
        self.record(Call::SetMetadata {
            pr_number,
            key: key.to_string(),
            value: value.clone(),
        });
        self.set_metadata(pr_number, key, value);
        Ok(())
    }
}
