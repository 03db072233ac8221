//! Branch + commit pointers

/// Prefixes accepted in front of a branch name, longest first
const BRANCH_PREFIXES: [&str; 2] = ["refs/heads/", "heads/"];

/// Length of the abbreviated commit id used in logs
const SHORT_ID_LEN: usize = 8;

/// An immutable branch + commit pointer
///
/// Accepts `refs/heads/<b>`, `heads/<b>` and `<b>`, all normalized to `<b>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ref {
    branch: String,
    commit_id: String,
}

impl Ref {
    /// Create a ref from a branch-like string and a commit id
    pub fn new(branch: &str, commit_id: impl Into<String>) -> Self {
        let branch = BRANCH_PREFIXES
            .iter()
            .find_map(|prefix| branch.strip_prefix(prefix))
            .unwrap_or(branch);
        Self {
            branch: branch.to_string(),
            commit_id: commit_id.into(),
        }
    }

    /// Canonical branch name
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Commit id this ref points at
    pub fn commit_id(&self) -> &str {
        &self.commit_id
    }

    /// Fully qualified ref, `refs/heads/<branch>`
    pub fn full_ref(&self) -> String {
        format!("refs/heads/{}", self.branch)
    }

    /// First 8 characters of the commit id
    pub fn short_id(&self) -> &str {
        self.commit_id
            .char_indices()
            .nth(SHORT_ID_LEN)
            .map_or(self.commit_id.as_str(), |(idx, _)| &self.commit_id[..idx])
    }
}

impl std::fmt::Display for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.branch, self.short_id())
    }
}
