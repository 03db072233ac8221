//! semantic-pr: automated release pull requests
//!
//! Keeps a long-lived release PR synchronized with a fast-moving default
//! branch, classifies incoming commits into a semantic-version bump and a
//! categorized changelog, and suspends automatic updates when a merge
//! conflict needs a human.

pub mod auth;
pub mod changelog;
pub mod config;
pub mod error;
pub mod platform;
pub mod refs;
pub mod sync;
pub mod types;
