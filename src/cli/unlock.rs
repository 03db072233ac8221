//! Unlock command - resume automatic updates after a conflict is resolved

use crate::cli::context::{CommandContext, GlobalOptions};
use crate::cli::style::{Stylize, check};
use anstream::println;
use dialoguer::Confirm;
use semantic_pr::error::{Error, Result};
use semantic_pr::sync::{is_pr_locked, unlock_pr};

/// Run the unlock command
pub async fn run_unlock(options: &GlobalOptions, pr_number: u64, yes: bool) -> Result<()> {
    let ctx = CommandContext::new(options).await?;

    if !is_pr_locked(&ctx.platform, pr_number).await? {
        println!("{}", format!("PR #{pr_number} is not locked").muted());
        return Ok(());
    }

    if !yes
        && !Confirm::new()
            .with_prompt(format!(
                "Has the merge conflict on PR #{pr_number} been resolved?"
            ))
            .default(false)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
    {
        println!("{}", "Aborted".muted());
        return Ok(());
    }

    unlock_pr(&ctx.platform, pr_number).await?;
    println!(
        "{} PR {} will update automatically again",
        check(),
        format!("#{pr_number}").accent()
    );
    Ok(())
}
