//! Shared test utilities

#![allow(dead_code)]

pub mod mock_platform;

pub use mock_platform::{BOT, Call, MockPlatform};

use semantic_pr::config::Config;
use semantic_pr::types::{PullRequest, RawCommit};

/// Default configuration: develop -> master, bot `semantic-pr[bot]`
pub fn test_config() -> Config {
    Config::default()
}

/// An open bot-owned release PR against `master`
pub fn release_pr(number: u64, head_ref: &str, head_sha: &str) -> PullRequest {
    PullRequest {
        number,
        author: BOT.to_string(),
        base_ref: "master".to_string(),
        head_ref: head_ref.to_string(),
        head_sha: head_sha.to_string(),
        labels: vec!["release-candidate".to_string(), "semver-none".to_string()],
    }
}

/// An open PR against `master` by someone other than the bot
pub fn human_pr(number: u64, head_ref: &str) -> PullRequest {
    PullRequest {
        author: "octocat".to_string(),
        labels: Vec::new(),
        ..release_pr(number, head_ref, "cafef00d")
    }
}

/// Commits with sequential ids `c1`, `c2`, ...
pub fn commits(messages: &[&str]) -> Vec<RawCommit> {
    messages
        .iter()
        .enumerate()
        .map(|(i, msg)| RawCommit::new(format!("c{}", i + 1), *msg))
        .collect()
}
