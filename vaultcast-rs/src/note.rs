//! Note representation.

use crate::error::{Result, SyncError};
use crate::parser::{parse_frontmatter, split_frontmatter};
use serde_yaml::Value as YamlValue;
use std::path::{Path, PathBuf};

/// A note read from disk for one sync pass.
#[derive(Debug, Clone)]
pub struct Note {
    /// Path the note was loaded from.
    pub path: PathBuf,

    /// Title derived from the file name; the key into the local index.
    pub title: String,

    /// Raw content of the note, frontmatter included.
    pub content: String,
}

impl Note {
    /// Create a note from a path and content, deriving its title.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, extension: &str) -> Result<Self> {
        let path = path.into();
        let title = derive_title(&path, extension)?;
        Ok(Self {
            path,
            title,
            content: content.into(),
        })
    }

    /// Load a note from disk. The extension is checked before the file is read.
    pub fn load(path: &Path, extension: &str) -> Result<Self> {
        let title = derive_title(path, extension)?;
        let content = std::fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            title,
            content,
        })
    }

    /// Content without frontmatter; this is what gets published.
    pub fn body(&self) -> &str {
        split_frontmatter(&self.content).body
    }

    /// Parse frontmatter as YAML.
    pub fn frontmatter(&self) -> Result<Option<YamlValue>> {
        parse_frontmatter(&self.content, &self.path)
    }
}

/// Derive a note title from its path: the file stem, provided the file
/// carries the note extension.
pub fn derive_title(path: &Path, extension: &str) -> Result<String> {
    let invalid = || SyncError::InvalidFileKind {
        path: path.to_path_buf(),
        expected: extension.to_string(),
    };

    if path.extension().and_then(|e| e.to_str()) != Some(extension) {
        return Err(invalid());
    }

    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)
}
