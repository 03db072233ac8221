//! Changeset builder - aggregates classified commits into categories and a bump level

use super::parser::{ParsedCommit, parse_commit};
use crate::types::RawCommit;
use serde::Serialize;
use tracing::trace;

/// Semantic version bump implied by a set of commits
///
/// Variants are declared in severity order; `Unknown` (a commit type we do
/// not recognise) outranks everything, including `Major`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    /// No releasable commits
    #[default]
    None,
    /// Fixes and internal changes
    Patch,
    /// New features
    Minor,
    /// Breaking changes
    Major,
    /// At least one commit with an unrecognised type
    Unknown,
}

impl BumpLevel {
    /// Severity of a single commit type (case-insensitive)
    pub fn for_type(commit_type: &str) -> Self {
        match commit_type.to_lowercase().as_str() {
            "chore" | "docs" | "style" | "refactor" | "perf" | "test" | "fix" | "internal" => {
                Self::Patch
            }
            "feat" => Self::Minor,
            "breaking change" => Self::Major,
            _ => Self::Unknown,
        }
    }

    /// Lower-case name, as used in labels
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Changelog section heading
///
/// Declaration order is the order sections are rendered in. Serializes as
/// the rendered heading text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Heading {
    /// `breaking` / `breaking change`
    #[serde(rename = "Breaking Changes")]
    BreakingChanges,
    /// `feat`
    Features,
    /// `fix`
    #[serde(rename = "Bug Fixes")]
    BugFixes,
    /// `chore`, `refactor`, `internal`, `perf`
    Internals,
    /// `docs`
    Documentation,
    /// Everything else
    Other,
}

impl Heading {
    /// Heading a commit type is filed under (case-insensitive)
    pub fn for_type(commit_type: &str) -> Self {
        match commit_type.to_lowercase().as_str() {
            "breaking" | "breaking change" => Self::BreakingChanges,
            "feat" => Self::Features,
            "fix" => Self::BugFixes,
            "chore" | "refactor" | "internal" | "perf" => Self::Internals,
            "docs" => Self::Documentation,
            _ => Self::Other,
        }
    }

    /// Display text
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BreakingChanges => "Breaking Changes",
            Self::Features => "Features",
            Self::BugFixes => "Bug Fixes",
            Self::Internals => "Internals",
            Self::Documentation => "Documentation",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One changelog bullet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangesetItem {
    /// Commit subject
    pub message: String,
    /// Text of the commit's breaking-change note
    pub breaking_change: Option<String>,
    /// PR the commit was merged from
    pub pull_number: Option<u64>,
}

/// Items for one scope inside a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subcategory {
    /// Scope as written in the commits
    pub scope: String,
    /// Items in encounter order
    pub items: Vec<ChangesetItem>,
}

/// All commits sharing one raw type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Raw commit type this category was created for
    pub commit_type: String,
    /// Heading, fixed when the category is created
    pub heading: Heading,
    /// Unscoped items
    pub items: Vec<ChangesetItem>,
    /// Scoped items, one level deep, in encounter order
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    fn new(commit_type: &str) -> Self {
        Self {
            commit_type: commit_type.to_string(),
            heading: Heading::for_type(commit_type),
            items: Vec::new(),
            subcategories: Vec::new(),
        }
    }

    fn insert(&mut self, scope: Option<&str>, item: ChangesetItem) {
        let Some(scope) = scope else {
            insert_item(&mut self.items, item);
            return;
        };

        let index = match self.subcategories.iter().position(|s| s.scope == scope) {
            Some(index) => index,
            None => {
                self.subcategories.push(Subcategory {
                    scope: scope.to_string(),
                    items: Vec::new(),
                });
                self.subcategories.len() - 1
            }
        };
        insert_item(&mut self.subcategories[index].items, item);
    }
}

/// Aggregated, categorised view of a commit range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Changeset {
    /// Maximum severity across all classified commits
    pub bump_level: BumpLevel,
    /// Categories in the order their raw type was first seen
    pub categories: Vec<Category>,
}

impl Changeset {
    /// Category for a raw commit type, if any commit had it
    pub fn category(&self, commit_type: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.commit_type == commit_type)
    }

    fn category_mut(&mut self, commit_type: &str) -> &mut Category {
        let index = match self
            .categories
            .iter()
            .position(|c| c.commit_type == commit_type)
        {
            Some(index) => index,
            None => {
                self.categories.push(Category::new(commit_type));
                self.categories.len() - 1
            }
        };
        &mut self.categories[index]
    }

    fn add(&mut self, commit: &ParsedCommit) {
        let Some(commit_type) = commit.commit_type.as_deref() else {
            return;
        };

        let breaking_note = commit.breaking_note();
        let mut severity = BumpLevel::for_type(commit_type);
        if breaking_note.is_some() {
            severity = severity.max(BumpLevel::Major);
        }
        self.bump_level = self.bump_level.max(severity);

        let item = ChangesetItem {
            message: commit.subject.clone().unwrap_or_default(),
            breaking_change: breaking_note.map(|n| n.text.clone()),
            pull_number: commit.pull_number(),
        };
        self.category_mut(commit_type)
            .insert(commit.scope.as_deref(), item);
    }
}

/// Build a changeset from commits in range order.
///
/// Commits without a conventional header are skipped.
pub fn build_changeset(commits: &[RawCommit]) -> Changeset {
    let mut changeset = Changeset::default();
    for commit in commits {
        let parsed = parse_commit(&commit.message);
        if parsed.commit_type.is_none() {
            trace!(commit = %commit.id, "skipping non-conventional commit");
            continue;
        }
        changeset.add(&parsed);
    }
    changeset
}

/// Append an item, collapsing it into an existing one with the same message.
fn insert_item(items: &mut Vec<ChangesetItem>, item: ChangesetItem) {
    if let Some(existing) = items.iter_mut().find(|i| i.message == item.message) {
        // PR title and squashed commit often share a subject
        if existing.pull_number.is_none() {
            existing.pull_number = item.pull_number;
        }
    } else {
        items.push(item);
    }
}
