//! Command-line interface

mod changelog;
mod context;
mod push;
mod regenerate;
pub mod style;
mod unlock;

use clap::{Parser, Subcommand};
use semantic_pr::error::Result;
use std::path::PathBuf;

pub use changelog::run_changelog;
pub use push::run_push;
pub use regenerate::run_regenerate;
pub use unlock::run_unlock;

/// Keeps a release PR in sync with your default branch and writes its semver changelog
#[derive(Debug, Parser)]
#[command(name = "semantic-pr", version, about)]
pub struct Cli {
    /// Repository as owner/repo
    #[arg(long, global = true, env = "SEMANTIC_PR_REPO")]
    pub repo: Option<String>,

    /// GitHub Enterprise host (defaults to github.com)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Handle a push: create, update or lock the release PR
    Push {
        /// Pushed ref (refs/heads/<branch>, heads/<branch> or <branch>)
        #[arg(long = "ref")]
        git_ref: String,

        /// Commit the ref now points at
        #[arg(long)]
        sha: String,
    },

    /// Rewrite the changelog and semver label of a PR
    Regenerate {
        /// PR number
        #[arg(long)]
        pr: u64,
    },

    /// Resume automatic updates of a PR locked on a merge conflict
    Unlock {
        /// PR number
        #[arg(long)]
        pr: u64,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Preview the changelog for a commit range
    Changelog {
        /// Base revision (defaults to the configured base branch)
        #[arg(long)]
        base: Option<String>,

        /// Head revision (defaults to the configured default branch)
        #[arg(long)]
        head: Option<String>,

        /// Print the changeset as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Run the selected command
    pub async fn execute(self) -> Result<()> {
        let options = context::GlobalOptions {
            repo: self.repo,
            host: self.host,
            config: self.config,
        };

        match self.command {
            Commands::Push { git_ref, sha } => run_push(&options, &git_ref, &sha).await,
            Commands::Regenerate { pr } => run_regenerate(&options, pr).await,
            Commands::Unlock { pr, yes } => run_unlock(&options, pr, yes).await,
            Commands::Changelog { base, head, json } => {
                run_changelog(&options, base.as_deref(), head.as_deref(), json).await
            }
        }
    }
}
