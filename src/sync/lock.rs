//! Conflict lock on release PRs

use crate::error::Result;
use crate::platform::MetadataStore;
use serde_json::Value;
use tracing::info;

/// Metadata key holding the conflict lock
pub const LOCK_KEY: &str = "locked_bc_merge_conflict";

/// Whether automatic updates to the PR are suspended
pub async fn is_pr_locked(store: &dyn MetadataStore, pr_number: u64) -> Result<bool> {
    let value = store.get(pr_number, LOCK_KEY).await?;
    Ok(value == Some(Value::Bool(true)))
}

/// Suspend automatic updates until a human resolves the conflict
pub async fn lock_pr(store: &dyn MetadataStore, pr_number: u64) -> Result<()> {
    info!(pr_number, "locking release PR");
    store.set(pr_number, LOCK_KEY, Value::Bool(true)).await
}

/// Resume automatic updates
pub async fn unlock_pr(store: &dyn MetadataStore, pr_number: u64) -> Result<()> {
    info!(pr_number, "unlocking release PR");
    store.set(pr_number, LOCK_KEY, Value::Bool(false)).await
}
