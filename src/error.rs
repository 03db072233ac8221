//! Error types for semantic-pr

use thiserror::Error;

/// Errors surfaced by the release synchronizer and its providers
///
/// Routine conditions (unparseable commits, truncated compare results,
/// rejected fast-forwards, merge conflicts) are values, not errors. Anything
/// that ends up here is an unexpected provider failure and fails the event.
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API returned an error or an unexpected response
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic provider failure (used by non-GitHub providers and test doubles)
    #[error("platform error: {0}")]
    Platform(String),

    /// Configuration could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    /// No usable authentication token
    #[error("authentication error: {0}")]
    Auth(String),

    /// Internal invariant violated
    #[error("internal error: {0}")]
    Internal(String),

    /// Error from the octocrab client
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Error from a raw HTTP request
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
