//! Per-repository configuration, loaded from TOML.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name for semantic-pr settings within the user config dir.
const CONFIG_DIR: &str = "semantic-pr";

/// Filename for configuration.
const CONFIG_FILE: &str = "config.toml";

/// Synchronizer configuration
///
/// Loaded once per event and passed down explicitly. Every field has a
/// default, so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Branch whose pushes feed the release PR
    pub default_branch: String,
    /// Branch the release PR targets
    pub base_branch: String,
    /// Login of the account that owns release PRs
    pub bot_name: String,
    /// Title given to newly created release PRs
    pub pr_title: String,
    /// Prefix for allocated release branch names
    pub release_branch_prefix: String,
    /// Label marking a PR as the release PR
    pub marker_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_branch: "develop".to_string(),
            base_branch: "master".to_string(),
            bot_name: "semantic-pr[bot]".to_string(),
            pr_title: "Release candidate".to_string(),
            release_branch_prefix: "release/".to_string(),
            marker_label: "release-candidate".to_string(),
        }
    }
}

/// Default config location, `<config dir>/semantic-pr/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load configuration from disk.
///
/// Returns the default `Config` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    parse_config(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(content)
}
