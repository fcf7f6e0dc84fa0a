//! YAML frontmatter splitting.

use crate::error::{Result, SyncError};
use serde_yaml::Value;
use std::path::Path;

/// Frontmatter extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML string (without delimiters).
    pub yaml: Option<&'a str>,
    /// The content after the frontmatter.
    pub body: &'a str,
}

/// Split content into frontmatter and body.
///
/// Frontmatter must open with `---` on the very first line and close with a
/// `---` line. Anything else is treated as body.
pub fn split_frontmatter(content: &str) -> FrontmatterSplit<'_> {
    let no_frontmatter = FrontmatterSplit {
        yaml: None,
        body: content,
    };

    let yaml_start = if content.starts_with("---\n") {
        4
    } else if content.starts_with("---\r\n") {
        5
    } else {
        return no_frontmatter;
    };

    let rest = &content[yaml_start..];

    // An empty block closes immediately.
    if let Some(after) = rest.strip_prefix("---") {
        return FrontmatterSplit {
            yaml: Some(""),
            body: strip_line_break(after),
        };
    }

    let closing = rest
        .find("\n---\n")
        .or_else(|| rest.find("\n---\r\n"))
        .or_else(|| rest.ends_with("\n---").then(|| rest.len() - 4));

    match closing {
        Some(pos) => FrontmatterSplit {
            yaml: Some(rest[..pos].trim_end_matches('\r')),
            body: strip_line_break(&rest[pos + 4..]),
        },
        None => no_frontmatter,
    }
}

fn strip_line_break(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

/// Parse frontmatter with path context for error messages.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<Option<Value>> {
    match split_frontmatter(content).yaml {
        Some(yaml) if yaml.trim().is_empty() => Ok(None),
        Some(yaml) => serde_yaml::from_str(yaml)
            .map(Some)
            .map_err(|e| SyncError::InvalidFrontmatter {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}
