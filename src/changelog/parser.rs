//! Conventional commit classifier
//!
//! Parses a raw commit message into type, scope, subject, the pull request
//! it was merged from (when it is a GitHub merge commit) and trailer notes.
//! Messages without a conventional header come back with no type and are
//! skipped by the changeset builder.

use regex::Regex;
use std::sync::LazyLock;

/// `type(scope): subject`; type allows word characters, hyphens and spaces
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[\w\- ]*)(?:\((?P<scope>[\w$.\-* ]*)\))?: (?P<subject>.*)$")
        .expect("Invalid regex")
});

/// First line of a GitHub merge commit
static MERGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge pull request #(?P<number>\d+) from (?P<owner>[^/]+)/(?P<branch>.*)$")
        .expect("Invalid regex")
});

/// Trailer line opening a note
static NOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s*]*(?P<title>breaking[ \-]change|breaking): ?(?P<text>.*)$")
        .expect("Invalid regex")
});

/// A trailer note such as `BREAKING CHANGE: ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitNote {
    /// Note keyword as written in the message
    pub title: String,
    /// Note text, including continuation lines
    pub text: String,
}

impl CommitNote {
    /// Whether this note announces a breaking change
    pub fn is_breaking(&self) -> bool {
        matches!(
            self.title.to_lowercase().as_str(),
            "breaking" | "breaking change" | "breaking-change"
        )
    }
}

/// A classified commit message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommit {
    /// Conventional type, as written (`feat`, `BREAKING CHANGE`, ...)
    pub commit_type: Option<String>,
    /// Optional scope from `type(scope)`
    pub scope: Option<String>,
    /// Header text after `: `
    pub subject: Option<String>,
    /// PR number from a `Merge pull request #N` line
    pub pull_number: Option<String>,
    /// Owner of the fork the PR was merged from
    pub pull_fork_owner: Option<String>,
    /// Branch the PR was merged from
    pub pull_branch: Option<String>,
    /// Trailer notes in message order
    pub notes: Vec<CommitNote>,
}

impl ParsedCommit {
    /// First note announcing a breaking change, if any
    pub fn breaking_note(&self) -> Option<&CommitNote> {
        self.notes.iter().find(|n| n.is_breaking())
    }

    /// PR number as an integer
    pub fn pull_number(&self) -> Option<u64> {
        self.pull_number.as_deref().and_then(|n| n.parse().ok())
    }
}

/// Classify one commit message. Never fails.
pub fn parse_commit(message: &str) -> ParsedCommit {
    let message = strip_quotes(message.trim());
    let mut parsed = ParsedCommit::default();
    let mut lines = message.lines().skip_while(|l| l.trim().is_empty());

    let Some(mut header) = lines.next() else {
        return parsed;
    };

    if let Some(caps) = MERGE_REGEX.captures(header.trim_end()) {
        parsed.pull_number = Some(caps["number"].to_string());
        parsed.pull_fork_owner = Some(caps["owner"].to_string());
        parsed.pull_branch = Some(caps["branch"].to_string());

        // Merge commits carry the PR title on the next non-empty line
        match lines.find(|l| !l.trim().is_empty()) {
            Some(next) => header = next,
            None => return parsed,
        }
    }

    if let Some(caps) = HEADER_REGEX.captures(header.trim_end()) {
        parsed.commit_type = non_empty(caps.name("type").map(|m| m.as_str()));
        parsed.scope = non_empty(caps.name("scope").map(|m| m.as_str()));
        parsed.subject = non_empty(caps.name("subject").map(|m| m.as_str()));
    }

    parsed.notes = parse_notes(lines);
    parsed
}

/// Collect notes from the lines after the header.
///
/// Lines before the first note are free-form body and are ignored. Non-empty
/// lines after a note are appended to it.
fn parse_notes<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<CommitNote> {
    let mut notes: Vec<CommitNote> = Vec::new();

    for line in lines {
        if let Some(caps) = NOTE_REGEX.captures(line) {
            notes.push(CommitNote {
                title: caps["title"].to_string(),
                text: caps["text"].trim().to_string(),
            });
        } else if let Some(last) = notes.last_mut() {
            let line = line.trim();
            if !line.is_empty() {
                if !last.text.is_empty() {
                    last.text.push('\n');
                }
                last.text.push_str(line);
            }
        }
    }

    notes
}

fn strip_quotes(message: &str) -> &str {
    message
        .strip_prefix('"')
        .and_then(|m| m.strip_suffix('"'))
        .filter(|m| !m.contains('"'))
        .unwrap_or(message)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(ToString::to_string)
}
