//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by every subcommand.

use semantic_pr::auth::get_github_auth;
use semantic_pr::config::{Config, default_config_path, load_config};
use semantic_pr::error::{Error, Result};
use semantic_pr::platform::GitHubService;
use semantic_pr::sync::SyncContext;
use semantic_pr::types::RepoConfig;
use std::path::PathBuf;
use tracing::debug;

/// Options shared by all subcommands
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Repository as owner/repo
    pub repo: Option<String>,
    /// GitHub Enterprise host
    pub host: Option<String>,
    /// Explicit config path
    pub config: Option<PathBuf>,
}

/// Shared context for CLI commands that interact with GitHub
///
/// Configuration is loaded once per invocation and threaded through
/// explicitly via [`CommandContext::sync`].
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// GitHub service for the selected repository
    pub platform: GitHubService,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// - Load configuration
    /// - Resolve the repository
    /// - Authenticate and create the GitHub service
    pub async fn new(options: &GlobalOptions) -> Result<Self> {
        let config = match options.config.clone().or_else(default_config_path) {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                load_config(&path)?
            }
            None => Config::default(),
        };

        let slug = options.repo.as_deref().ok_or_else(|| {
            Error::Config("no repository given; pass --repo owner/repo".to_string())
        })?;
        let repo = RepoConfig::parse(slug, options.host.clone())
            .ok_or_else(|| Error::Config(format!("invalid repository '{slug}', expected owner/repo")))?;

        let auth = get_github_auth().await?;
        debug!(source = ?auth.source, repo = %repo, "authenticated");
        let platform = GitHubService::new(&auth.token, repo)?;

        Ok(Self { config, platform })
    }

    /// Synchronizer context over this command's config and platform
    pub fn sync(&self) -> SyncContext<'_> {
        SyncContext::new(&self.config, &self.platform)
    }
}
