//! Conventional-commit changelog generation
//!
//! Three pure stages, no I/O:
//! 1. Classify - parse each commit message (`parser`)
//! 2. Aggregate - build a categorised `Changeset` and bump level (`changeset`)
//! 3. Render - turn the changeset into markdown (`render`)

mod changeset;
mod parser;
mod render;

pub use changeset::{
    BumpLevel, Category, Changeset, ChangesetItem, Heading, Subcategory, build_changeset,
};
pub use parser::{CommitNote, ParsedCommit, parse_commit};
pub use render::render_changelog;

use crate::types::RawCommit;

/// Rendered changelog plus the bump level it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    /// Overall version bump
    pub bump_level: BumpLevel,
    /// Markdown body
    pub body: String,
}

/// Classify, aggregate and render a commit range
pub fn generate_changelog(commits: &[RawCommit]) -> Changelog {
    let changeset = build_changeset(commits);
    Changelog {
        bump_level: changeset.bump_level,
        body: render_changelog(&changeset),
    }
}
