//! Push command - handle one push event

use crate::cli::context::{CommandContext, GlobalOptions};
use crate::cli::style::{Stylize, check};
use anstream::println;
use semantic_pr::error::Result;
use semantic_pr::sync::{PushEvent, PushOutcome, handle_push};

/// Run the push command
pub async fn run_push(options: &GlobalOptions, git_ref: &str, sha: &str) -> Result<()> {
    let ctx = CommandContext::new(options).await?;
    let event = PushEvent::new(git_ref, sha);

    let outcome = handle_push(&ctx.sync(), &event).await?;

    match outcome {
        PushOutcome::Ignored | PushOutcome::ReleaseBranchReserved | PushOutcome::UpToDate { .. } => {
            println!("{}", outcome.to_string().muted());
        }
        PushOutcome::Locked { .. } | PushOutcome::Conflicted { .. } => {
            println!("{}", outcome.to_string().warning());
        }
        PushOutcome::Created { .. } | PushOutcome::Updated { .. } => {
            println!("{} {}", check(), outcome);
        }
    }

    Ok(())
}
