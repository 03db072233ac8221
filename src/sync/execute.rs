//! Sync execution - effectful push and regenerate handling
//!
//! Takes decisions from `plan` and carries them out through the platform
//! traits. Provider calls are awaited strictly in order: lock check, branch
//! update, conflict comment, lock write. A reader that sees the lock set is
//! guaranteed the explanatory comment already exists.

use crate::changelog::{Changelog, generate_changelog};
use crate::config::Config;
use crate::error::Result;
use crate::platform::{GitService, MetadataStore, PULLS_PER_PAGE, PullRequestService};
use crate::refs::Ref;
use crate::sync::commits::find_commits_between;
use crate::sync::lock::{is_pr_locked, lock_pr};
use crate::sync::plan::{
    PushEvent, PushKind, UpdateAction, allocate_branch_name, classify_push, conflict_comment,
    merge_commit_message, next_labels, plan_update, semver_label,
};
use crate::types::{MergeOutcome, PullRequest};
use tracing::{debug, info, warn};

/// Everything one event needs: configuration and the platform providers
///
/// Built fresh per event; nothing here is cached between events.
#[derive(Clone, Copy)]
pub struct SyncContext<'a> {
    /// Repository configuration
    pub config: &'a Config,
    /// Commit range, ref and merge operations
    pub git: &'a dyn GitService,
    /// Pull request operations
    pub pulls: &'a dyn PullRequestService,
    /// Per-PR metadata (conflict lock)
    pub metadata: &'a dyn MetadataStore,
}

impl<'a> SyncContext<'a> {
    /// Context backed by a single service implementing every provider
    pub fn new<P>(config: &'a Config, platform: &'a P) -> Self
    where
        P: GitService + PullRequestService + MetadataStore,
    {
        Self {
            config,
            git: platform,
            pulls: platform,
            metadata: platform,
        }
    }
}

/// How the release branch was moved forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    /// Ref was fast-forwarded to the pushed commit
    FastForward,
    /// Pushed branch was merged into the release branch
    Merge,
}

impl std::fmt::Display for UpdateMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FastForward => write!(f, "fast-forward"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Which transition a push event took
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Push was not to a tracked branch
    Ignored,
    /// Push to a release branch; reserved, nothing done
    ReleaseBranchReserved,
    /// No release PR existed; one was opened
    Created {
        /// New PR number
        pr_number: u64,
    },
    /// Release PR is locked on a conflict; push ignored
    Locked {
        /// PR number
        pr_number: u64,
    },
    /// Release branch already at the pushed commit
    UpToDate {
        /// PR number
        pr_number: u64,
    },
    /// Release branch advanced and changelog regenerated
    Updated {
        /// PR number
        pr_number: u64,
        /// How the branch was advanced
        method: UpdateMethod,
        /// Bump level of the regenerated changelog
        bump_level: crate::changelog::BumpLevel,
    },
    /// Merge conflicted; PR commented on and locked
    Conflicted {
        /// PR number
        pr_number: u64,
    },
}

impl std::fmt::Display for PushOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignored => write!(f, "push ignored"),
            Self::ReleaseBranchReserved => write!(f, "release branch push not handled"),
            Self::Created { pr_number } => write!(f, "created release PR #{pr_number}"),
            Self::Locked { pr_number } => {
                write!(f, "release PR #{pr_number} is locked on a merge conflict")
            }
            Self::UpToDate { pr_number } => write!(f, "release PR #{pr_number} is up to date"),
            Self::Updated {
                pr_number,
                method,
                bump_level,
            } => write!(
                f,
                "updated release PR #{pr_number} by {method} (semver-{bump_level})"
            ),
            Self::Conflicted { pr_number } => {
                write!(f, "release PR #{pr_number} locked: merge conflict")
            }
        }
    }
}

/// Result of moving the release branch
enum BranchUpdate {
    Advanced(UpdateMethod),
    Conflict,
}

/// Where the release PR for this push came from
enum ReleasePr {
    /// Opened by this event
    Created(PullRequest),
    /// Another event opened one while we were creating ours
    Adopted(PullRequest),
}

/// Handle one push event
pub async fn handle_push(ctx: &SyncContext<'_>, event: &PushEvent) -> Result<PushOutcome> {
    match classify_push(event, ctx.config) {
        PushKind::Other => {
            debug!(git_ref = %event.git_ref, "ignoring push to untracked branch");
            Ok(PushOutcome::Ignored)
        }
        PushKind::ReleaseBranch(pushed) => {
            info!(branch = pushed.branch(), "pushes to release branches are not handled");
            Ok(PushOutcome::ReleaseBranchReserved)
        }
        PushKind::DefaultBranch(pushed) => handle_default_branch_push(ctx, &pushed).await,
    }
}

async fn handle_default_branch_push(ctx: &SyncContext<'_>, pushed: &Ref) -> Result<PushOutcome> {
    info!(branch = pushed.branch(), sha = pushed.short_id(), "received push");

    let pr = match find_release_pr(ctx).await? {
        Some(pr) => {
            info!(pr_number = pr.number, branch = %pr.head_ref, "found release PR");
            pr
        }
        None => match create_release_pr(ctx, pushed).await? {
            ReleasePr::Created(pr) => {
                return Ok(PushOutcome::Created {
                    pr_number: pr.number,
                });
            }
            ReleasePr::Adopted(pr) => pr,
        },
    };

    sync_release_pr(ctx, &pr, pushed).await
}

/// Bring an open release PR up to date with a pushed commit
async fn sync_release_pr(
    ctx: &SyncContext<'_>,
    pr: &PullRequest,
    pushed: &Ref,
) -> Result<PushOutcome> {
    let release = Ref::new(&pr.head_ref, pr.head_sha.as_str());
    let locked = is_pr_locked(ctx.metadata, pr.number).await?;

    match plan_update(&release, pushed, locked) {
        UpdateAction::SkipLocked => {
            info!(
                pr_number = pr.number,
                "not updating release PR: waiting for merge conflict resolution"
            );
            Ok(PushOutcome::Locked {
                pr_number: pr.number,
            })
        }
        UpdateAction::UpToDate => {
            debug!(pr_number = pr.number, "release branch already at pushed commit");
            Ok(PushOutcome::UpToDate {
                pr_number: pr.number,
            })
        }
        UpdateAction::Advance => match update_branch(ctx, &release, pushed).await? {
            BranchUpdate::Advanced(method) => {
                let changelog = regenerate_changelog(ctx, pr).await?;
                Ok(PushOutcome::Updated {
                    pr_number: pr.number,
                    method,
                    bump_level: changelog.bump_level,
                })
            }
            BranchUpdate::Conflict => {
                warn!(
                    pr_number = pr.number,
                    branch = pushed.branch(),
                    "merge conflict; locking release PR"
                );
                ctx.pulls
                    .create_comment(pr.number, &conflict_comment(pushed))
                    .await?;
                lock_pr(ctx.metadata, pr.number).await?;
                Ok(PushOutcome::Conflicted {
                    pr_number: pr.number,
                })
            }
        },
    }
}

/// Fast-forward the release branch, falling back to a merge
async fn update_branch(ctx: &SyncContext<'_>, release: &Ref, pushed: &Ref) -> Result<BranchUpdate> {
    info!(
        branch = release.branch(),
        from = release.short_id(),
        to = pushed.short_id(),
        "updating release branch"
    );

    match ctx.git.update_ref(release.branch(), pushed.commit_id()).await {
        Ok(()) => return Ok(BranchUpdate::Advanced(UpdateMethod::FastForward)),
        Err(e) => {
            debug!(branch = release.branch(), error = %e, "fast-forward rejected, merging instead");
        }
    }

    let message = merge_commit_message(release, pushed);
    match ctx
        .git
        .merge(release.branch(), pushed.branch(), &message)
        .await?
    {
        MergeOutcome::Merged { sha } => {
            info!(branch = release.branch(), %sha, "merge successful");
            Ok(BranchUpdate::Advanced(UpdateMethod::Merge))
        }
        MergeOutcome::UpToDate => {
            debug!(branch = release.branch(), "nothing to merge");
            Ok(BranchUpdate::Advanced(UpdateMethod::Merge))
        }
        MergeOutcome::Conflict => Ok(BranchUpdate::Conflict),
    }
}

/// Find the bot-owned open PR against the base branch.
///
/// Pages through open PRs, newest first, and stops at the first page
/// containing one. If several exist the most recent wins.
pub async fn find_release_pr(ctx: &SyncContext<'_>) -> Result<Option<PullRequest>> {
    let base = &ctx.config.base_branch;
    let bot = &ctx.config.bot_name;
    let mut page = 1;

    loop {
        let prs = ctx.pulls.list_open_prs(base, page).await?;
        let page_len = prs.len();

        if let Some(pr) = prs.into_iter().find(|pr| &pr.author == bot) {
            return Ok(Some(pr));
        }
        if page_len < PULLS_PER_PAGE {
            debug!(base = %base, pages = page, "no release PR found");
            return Ok(None);
        }
        page += 1;
    }
}

/// Open a release PR on a fresh branch at the pushed commit.
///
/// Re-checks for a release PR after the branch exists; if another event won
/// the race, its PR is adopted and ours is not opened.
async fn create_release_pr(ctx: &SyncContext<'_>, pushed: &Ref) -> Result<ReleasePr> {
    let config = ctx.config;
    let branch = allocate_branch_name(&config.release_branch_prefix);
    ctx.git.create_ref(&branch, pushed.commit_id()).await?;
    info!(branch = %branch, sha = pushed.short_id(), "created release branch");

    if let Some(existing) = find_release_pr(ctx).await? {
        warn!(
            pr_number = existing.number,
            branch = %branch,
            "release PR appeared concurrently; adopting it"
        );
        return Ok(ReleasePr::Adopted(existing));
    }

    let commits = find_commits_between(ctx.git, &config.base_branch, &branch).await?;
    let changelog = generate_changelog(&commits);

    let pr = ctx
        .pulls
        .create_pr(&config.pr_title, &branch, &config.base_branch, &changelog.body)
        .await?;
    ctx.pulls
        .add_labels(
            pr.number,
            &[config.marker_label.clone(), semver_label(changelog.bump_level)],
        )
        .await?;

    info!(
        pr_number = pr.number,
        bump = %changelog.bump_level,
        commits = commits.len(),
        "created release PR"
    );
    Ok(ReleasePr::Created(pr))
}

/// Recompute the changelog for a PR and rewrite its body and semver label
pub async fn regenerate_changelog(ctx: &SyncContext<'_>, pr: &PullRequest) -> Result<Changelog> {
    let commits = find_commits_between(ctx.git, &pr.base_ref, &pr.head_ref).await?;
    let changelog = generate_changelog(&commits);
    let labels = next_labels(&pr.labels, changelog.bump_level);

    ctx.pulls
        .update_pr(pr.number, &changelog.body, &labels)
        .await?;

    info!(
        pr_number = pr.number,
        bump = %changelog.bump_level,
        commits = commits.len(),
        "regenerated changelog"
    );
    Ok(changelog)
}

/// Regenerate the changelog of a PR by number, regardless of lock state
pub async fn regenerate(ctx: &SyncContext<'_>, pr_number: u64) -> Result<Changelog> {
    let pr = ctx.pulls.get_pr(pr_number).await?;
    regenerate_changelog(ctx, &pr).await
}
