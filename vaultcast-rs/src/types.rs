//! Shared types for vaultcast.

use crate::error::SyncError;
use serde::Serialize;
use std::path::PathBuf;

/// A `[[wikilink]]` or `![[embed]]` tag found in a note body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRef {
    /// The target note title or asset name.
    pub target: String,

    /// Optional display alias (the part after |). For embeds this is usually a size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Optional heading reference (the part after #).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Whether this is an embed (![[...]]) rather than a link.
    pub embed: bool,

    /// Byte offset of the first character of the tag.
    pub start: usize,

    /// Byte offset one past the closing `]]`.
    pub end: usize,

    /// Line number where this tag appears (1-indexed).
    pub line: usize,
}

impl TagRef {
    /// The exact source text of the tag.
    pub fn raw<'a>(&self, body: &'a str) -> &'a str {
        &body[self.start..self.end]
    }

    /// Returns the display text for a link tag.
    pub fn display_text(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.target)
    }
}

/// What happened to a single tag.
#[derive(Debug)]
pub enum TagOutcome {
    /// The tag is replaced by `replacement`.
    Resolved { original: String, replacement: String },
    /// The tag stays as it was; `error` says why.
    Unchanged { original: String, error: SyncError },
}

impl TagOutcome {
    pub fn original(&self) -> &str {
        match self {
            TagOutcome::Resolved { original, .. } | TagOutcome::Unchanged { original, .. } => {
                original
            }
        }
    }

    /// Text to splice back into the body.
    pub fn text(&self) -> &str {
        match self {
            TagOutcome::Resolved { replacement, .. } => replacement,
            TagOutcome::Unchanged { original, .. } => original,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TagOutcome::Resolved { .. })
    }
}

/// A rewritten body together with the per-tag outcomes that produced it.
#[derive(Debug, Default)]
pub struct Rewrite {
    pub body: String,
    pub outcomes: Vec<TagOutcome>,
}

impl Rewrite {
    /// Build the new body by replacing each tag span with its outcome text.
    ///
    /// `tags` must be ordered by position and not overlap; `outcomes[i]`
    /// belongs to `tags[i]`.
    pub fn splice(body: &str, tags: &[TagRef], outcomes: Vec<TagOutcome>) -> Self {
        debug_assert_eq!(tags.len(), outcomes.len());

        let mut out = String::with_capacity(body.len());
        let mut cursor = 0;
        for (tag, outcome) in tags.iter().zip(&outcomes) {
            out.push_str(&body[cursor..tag.start]);
            out.push_str(outcome.text());
            cursor = tag.end;
        }
        out.push_str(&body[cursor..]);

        Self { body: out, outcomes }
    }

    /// Tags left unchanged, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SyncError)> {
        self.outcomes.iter().filter_map(|o| match o {
            TagOutcome::Unchanged { original, error } => Some((original.as_str(), error)),
            TagOutcome::Resolved { .. } => None,
        })
    }

    pub fn resolved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_resolved()).count()
    }
}

/// A tag that could not be rewritten, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagFailure {
    pub tag: String,
    pub error: String,
}

/// Which remote write a publish performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishAction {
    Created,
    Updated,
}

/// Result of publishing one note.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub title: String,
    pub path: PathBuf,
    pub action: PublishAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    pub post_id: i64,
    pub images_uploaded: usize,
    pub links_resolved: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_failures: Vec<TagFailure>,
}
