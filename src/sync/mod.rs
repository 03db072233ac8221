//! Release PR synchronizer
//!
//! Keeps one release PR per base branch in step with the default branch.
//! Two-phase pattern:
//! 1. Plan - route the push and decide the transition (`plan`, pure)
//! 2. Execute - create, fast-forward, merge or lock via the platform (`execute`)
//!
//! Release PR state (absent, open, open and locked) is read from the
//! platform on every event and never cached.

mod commits;
mod execute;
mod lock;
mod plan;

pub use commits::find_commits_between;
pub use execute::{
    PushOutcome, SyncContext, UpdateMethod, find_release_pr, handle_push, regenerate,
    regenerate_changelog,
};
pub use lock::{LOCK_KEY, is_pr_locked, lock_pr, unlock_pr};
pub use plan::{
    PushEvent, PushKind, SEMVER_LABEL_PREFIX, UpdateAction, allocate_branch_name, classify_push,
    conflict_comment, merge_commit_message, next_labels, plan_update, semver_label,
};
