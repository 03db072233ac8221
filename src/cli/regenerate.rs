//! Regenerate command - rewrite a PR's changelog on demand

use crate::cli::context::{CommandContext, GlobalOptions};
use crate::cli::style::{Stylize, check};
use anstream::println;
use semantic_pr::error::Result;
use semantic_pr::sync::{regenerate, semver_label};

/// Run the regenerate command
pub async fn run_regenerate(options: &GlobalOptions, pr_number: u64) -> Result<()> {
    let ctx = CommandContext::new(options).await?;

    let changelog = regenerate(&ctx.sync(), pr_number).await?;

    println!(
        "{} Regenerated changelog for PR {} ({})",
        check(),
        format!("#{pr_number}").accent(),
        semver_label(changelog.bump_level).emphasis()
    );
    Ok(())
}
