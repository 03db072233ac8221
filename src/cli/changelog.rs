//! Changelog command - preview the changelog for a range without touching any PR

use crate::cli::context::{CommandContext, GlobalOptions};
use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use semantic_pr::changelog::{build_changeset, render_changelog};
use semantic_pr::error::{Error, Result};
use semantic_pr::sync::{find_commits_between, semver_label};
use std::time::Duration;

/// Run the changelog command
pub async fn run_changelog(
    options: &GlobalOptions,
    base: Option<&str>,
    head: Option<&str>,
    json: bool,
) -> Result<()> {
    let ctx = CommandContext::new(options).await?;
    let base = base.unwrap_or(&ctx.config.base_branch);
    let head = head.unwrap_or(&ctx.config.default_branch);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Fetching commits {base}..{head}"));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let commits = find_commits_between(&ctx.platform, base, head).await;
    spinner.finish_and_clear();
    let commits = commits?;

    let changeset = build_changeset(&commits);

    if json {
        let text = serde_json::to_string_pretty(&changeset)
            .map_err(|e| Error::Internal(format!("failed to serialize changeset: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    println!(
        "{} {} commits, bump {}",
        check(),
        commits.len().accent(),
        semver_label(changeset.bump_level).emphasis()
    );
    println!();

    let body = render_changelog(&changeset);
    if body.is_empty() {
        println!("{}", "No conventional commits in range".muted());
    } else {
        println!("{body}");
    }
    Ok(())
}
