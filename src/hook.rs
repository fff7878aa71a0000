//! Version-control hook boundary
//!
//! An external post-commit mechanism invokes [`summarize_for_hook`] with
//! the commit it just made; this crate only decides whether the commit is
//! worth a journal entry and what that entry should say. Installing or
//! managing the hook itself is not this crate's concern.
//!
//! Two ways a commit becomes a decision:
//! - An explicit `Decision:` line in the commit message, optionally
//!   followed by `Rationale:` / `Category:` / `Impact:` / `Tags:` lines.
//! - A recognizable subject keyword (fix, test, refactor, ...), which
//!   yields a low-impact entry in the matching category.
//!
//! Ordinary commits produce `None`; the journal is for decisions, not a
//! commit log mirror.

use chrono::{DateTime, Utc};

use crate::types::{DecisionCategory, DecisionDraft, DecisionImpact};

/// What the post-commit hook hands us.
#[derive(Debug, Clone)]
pub struct CommitContext {
    /// Commit identifier (hash)
    pub id: String,
    /// Full commit message
    pub message: String,
    /// Author name
    pub author: String,
    /// Commit timestamp
    pub committed_at: DateTime<Utc>,
    /// Paths touched by the commit
    pub files_changed: Vec<String>,
}

/// Subject keywords mapped to categories for commits without an explicit
/// `Decision:` marker.
const KEYWORD_CATEGORIES: &[(&str, DecisionCategory)] = &[
    ("fix", DecisionCategory::IssueResolution),
    ("bug", DecisionCategory::IssueResolution),
    ("resolve", DecisionCategory::IssueResolution),
    ("workaround", DecisionCategory::IssueResolution),
    ("test", DecisionCategory::Testing),
    ("refactor", DecisionCategory::Architecture),
    ("redesign", DecisionCategory::Architecture),
    ("rework", DecisionCategory::Architecture),
];

/// Pure summarization: decide whether this commit warrants a journal entry.
pub fn summarize_for_hook(commit: &CommitContext) -> Option<DecisionDraft> {
    let draft = match parse_marked_message(&commit.message) {
        Some(draft) => draft,
        None => classify_subject(&commit.message)?,
    };

    Some(
        draft
            .context_entry("commit", serde_json::Value::String(commit.id.clone()))
            .context_entry("author", serde_json::Value::String(commit.author.clone()))
            .context_entry(
                "files_changed",
                serde_json::Value::from(commit.files_changed.clone()),
            ),
    )
}

/// Parse an explicit `Decision:` marker with optional trailer lines.
fn parse_marked_message(message: &str) -> Option<DecisionDraft> {
    let mut decision_text: Option<String> = None;
    let mut draft = DecisionDraft::default();

    for line in message.lines() {
        let line = line.trim();
        if let Some(rest) = strip_marker(line, "Decision:") {
            decision_text = Some(rest.to_string());
        } else if let Some(rest) = strip_marker(line, "Rationale:") {
            draft.rationale = rest.to_string();
        } else if let Some(rest) = strip_marker(line, "Category:") {
            draft.category = Some(DecisionCategory::parse_lenient(rest));
        } else if let Some(rest) = strip_marker(line, "Impact:") {
            draft.impact = rest.parse().ok();
        } else if let Some(rest) = strip_marker(line, "Tags:") {
            draft.tags = rest
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
    }

    let text = decision_text?;
    draft.decision = text;
    if draft.category.is_none() {
        draft.category = Some(DecisionCategory::Other);
    }
    Some(draft)
}

/// Case-insensitive prefix strip for marker lines. Byte-offset slicing must
/// stay on a char boundary; commit messages are arbitrary UTF-8.
fn strip_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let prefix = line.get(..marker.len())?;
    if prefix.eq_ignore_ascii_case(marker) {
        Some(line[marker.len()..].trim())
    } else {
        None
    }
}

/// Keyword classification of the commit subject for unmarked commits.
fn classify_subject(message: &str) -> Option<DecisionDraft> {
    let subject = message.lines().next()?.trim();
    if subject.is_empty() {
        return None;
    }
    let lowered = subject.to_lowercase();

    let (_, category) = KEYWORD_CATEGORIES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))?;

    Some(
        DecisionDraft::new(*category, subject)
            .impact(DecisionImpact::Low)
            .tags(["auto-captured"]),
    )
}
