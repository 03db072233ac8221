//! Markdown rendering for changesets
//!
//! Output is byte-stable for a given changeset; callers compare rendered
//! bodies to tell whether anything changed.

use super::changeset::{Changeset, ChangesetItem};
use std::fmt::Write;

/// Render a changeset as markdown.
///
/// Categories are ordered by heading priority; categories sharing a heading
/// keep the order their raw types were first seen in.
pub fn render_changelog(changeset: &Changeset) -> String {
    let mut categories: Vec<_> = changeset.categories.iter().collect();
    // Stable sort keeps encounter order within a heading
    categories.sort_by_key(|c| c.heading);

    let mut out = String::new();
    for category in categories {
        push_section(&mut out, "##", category.heading.as_str(), &category.items);
        for sub in &category.subcategories {
            push_section(&mut out, "###", &capitalize(&sub.scope), &sub.items);
        }
    }

    out.trim().to_string()
}

fn push_section(out: &mut String, marker: &str, title: &str, items: &[ChangesetItem]) {
    let _ = writeln!(out, "{marker} {title}");
    if !items.is_empty() {
        out.push('\n');
        for item in items {
            let _ = writeln!(out, "* {item}");
        }
    }
    out.push('\n');
}

impl std::fmt::Display for ChangesetItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        if let Some(number) = self.pull_number {
            write!(f, " (#{number})")?;
        }
        if let Some(text) = &self.breaking_change {
            write!(f, "\n  **Breaking Change**: {text}")?;
        }
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::build_changeset;
    use crate::types::RawCommit;

    fn render(messages: &[&str]) -> String {
        let commits: Vec<_> = messages
            .iter()
            .map(|m| RawCommit::new("sha", *m))
            .collect();
        render_changelog(&build_changeset(&commits))
    }

    #[test]
    fn test_empty_changeset_renders_empty_string() {
        assert_eq!(render(&[]), "");
        assert_eq!(render(&["not conventional"]), "");
    }

    #[test]
    fn test_single_item() {
        assert_eq!(render(&["fix: a bug"]), "## Bug Fixes\n\n* a bug");
    }

    #[test]
    fn test_pull_number_suffix() {
        assert_eq!(
            render(&["Merge pull request #9 from a/b\n\nfeat: thing"]),
            "## Features\n\n* thing (#9)"
        );
    }

    #[test]
    fn test_heading_priority_order() {
        let out = render(&["docs: d", "wip: o", "chore: i", "fix: b", "feat: f"]);
        let headings: Vec<_> = out.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(
            headings,
            [
                "## Features",
                "## Bug Fixes",
                "## Internals",
                "## Documentation",
                "## Other"
            ]
        );
    }

    #[test]
    fn test_same_heading_keeps_encounter_order() {
        let out = render(&["refactor: r", "chore: c"]);
        assert_eq!(out, "## Internals\n\n* r\n\n## Internals\n\n* c");
    }

    #[test]
    fn test_subcategory_heading_is_capitalized() {
        assert_eq!(
            render(&["feat(cli): add flag"]),
            "## Features\n\n### Cli\n\n* add flag"
        );
    }

    #[test]
    fn test_breaking_change_annotation() {
        assert_eq!(
            render(&["fix: x\n\nBREAKING CHANGE: y"]),
            "## Bug Fixes\n\n* x\n  **Breaking Change**: y"
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("typescript"), "Typescript");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }
}
