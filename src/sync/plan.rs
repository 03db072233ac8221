//! Sync planning - pure decisions for the release synchronizer
//!
//! Everything the state machine decides without talking to the platform
//! lives here: how a push is routed, what an open release PR needs, which
//! labels it should carry, and the fixed texts the bot writes.

use crate::changelog::BumpLevel;
use crate::config::Config;
use crate::refs::Ref;
use rand::Rng;

/// Prefix shared by every bump label
pub const SEMVER_LABEL_PREFIX: &str = "semver-";

/// Release branch suffixes are drawn from `0..RELEASE_SUFFIX_RANGE`
const RELEASE_SUFFIX_RANGE: u32 = 1_000_000_000;

/// A push event as delivered by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// Pushed ref, usually `refs/heads/<branch>`
    pub git_ref: String,
    /// Commit the ref now points at
    pub after: String,
}

impl PushEvent {
    /// Create a push event
    pub fn new(git_ref: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            git_ref: git_ref.into(),
            after: after.into(),
        }
    }
}

/// How a push is handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushKind {
    /// Push to the configured default branch
    DefaultBranch(Ref),
    /// Push to a release branch. Reserved: not handled yet.
    ReleaseBranch(Ref),
    /// Push to any other branch
    Other,
}

/// Route a push by the branch it touched
pub fn classify_push(event: &PushEvent, config: &Config) -> PushKind {
    let pushed = Ref::new(&event.git_ref, event.after.as_str());
    if pushed.branch() == config.default_branch {
        PushKind::DefaultBranch(pushed)
    } else if pushed.branch().starts_with(&config.release_branch_prefix) {
        PushKind::ReleaseBranch(pushed)
    } else {
        PushKind::Other
    }
}

/// What an existing release PR needs after a default-branch push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// PR is locked on a conflict; leave it alone
    SkipLocked,
    /// Release branch already points at the pushed commit
    UpToDate,
    /// Move the release branch forward
    Advance,
}

/// Decide what to do with an open release PR. The lock wins over everything.
pub fn plan_update(release: &Ref, pushed: &Ref, locked: bool) -> UpdateAction {
    if locked {
        UpdateAction::SkipLocked
    } else if release.commit_id() == pushed.commit_id() {
        UpdateAction::UpToDate
    } else {
        UpdateAction::Advance
    }
}

/// Label for a bump level, e.g. `semver-minor`
pub fn semver_label(bump: BumpLevel) -> String {
    format!("{SEMVER_LABEL_PREFIX}{bump}")
}

/// Existing labels minus any `semver-*` label, plus the one for `bump`.
///
/// Order of the surviving labels is preserved.
pub fn next_labels(existing: &[String], bump: BumpLevel) -> Vec<String> {
    let mut labels: Vec<String> = existing
        .iter()
        .filter(|l| !l.starts_with(SEMVER_LABEL_PREFIX))
        .cloned()
        .collect();
    labels.push(semver_label(bump));
    labels
}

/// Allocate a fresh release branch name
pub fn allocate_branch_name(prefix: &str) -> String {
    let suffix = rand::thread_rng().gen_range(0..RELEASE_SUFFIX_RANGE);
    format!("{prefix}{suffix}")
}

/// Commit message for merging the pushed branch into the release branch
pub fn merge_commit_message(release: &Ref, pushed: &Ref) -> String {
    format!(
        "Auto-merging {} into {}",
        pushed.branch(),
        release.branch()
    )
}

/// Comment posted when the release PR is locked on a conflict
pub fn conflict_comment(pushed: &Ref) -> String {
    let branch = pushed.branch();
    format!(
        "There is a merge conflict between this branch and {branch}. \
         This PR will not be updated automatically from {branch} until the merge conflict is resolved manually."
    )
}
