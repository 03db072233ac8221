//! Commit range lookup with a fallback history walk

use crate::error::Result;
use crate::platform::{COMMITS_PER_PAGE, GitService};
use crate::types::RawCommit;
use tracing::debug;

/// Commits reachable from `head` but not from `base`, oldest first.
///
/// Uses the compare endpoint when it returns the whole range. When the
/// result is truncated, walks history page by page from `head` until the
/// commit `base` points at is reached.
pub async fn find_commits_between(
    git: &dyn GitService,
    base: &str,
    head: &str,
) -> Result<Vec<RawCommit>> {
    let comparison = git.compare_commits(base, head).await?;
    if !comparison.is_truncated() {
        return Ok(comparison.commits);
    }

    debug!(
        base,
        head,
        total = comparison.total_commits,
        returned = comparison.commits.len(),
        "compare result incomplete, walking history"
    );

    let base_sha = git.resolve_commit(base).await?;
    let mut collected = Vec::new();
    let mut page = 1;

    'walk: loop {
        let commits = git.list_commits(head, page).await?;
        let page_len = commits.len();

        for commit in commits {
            if commit.id == base_sha {
                break 'walk;
            }
            collected.push(commit);
        }

        if page_len < COMMITS_PER_PAGE {
            break;
        }
        page += 1;
    }

    // History pages are newest first
    collected.reverse();
    debug!(count = collected.len(), pages = page, "walked history");
    Ok(collected)
}
