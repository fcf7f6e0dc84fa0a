//! Vault representation and the whole-vault sync loop.

use crate::config::{dir_key, Config};
use crate::error::{Result, SyncError, CREDENTIALS_HINT};
use crate::publish::Publisher;
use crate::remote::{Categories, ForumApi};
use crate::types::PublishReport;
use glob::{glob, Pattern};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Represents an Obsidian vault.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,

    /// Note extension without the dot.
    pub extension: String,
}

impl Vault {
    /// Create a new vault instance.
    ///
    /// The root is canonicalized, so `.` or `./notes` work as well as
    /// absolute paths.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Result<Self> {
        let given = root.into();
        let root = std::fs::canonicalize(&given).map_err(|_| SyncError::VaultNotFound(given))?;

        if !root.is_dir() {
            return Err(SyncError::VaultNotFound(root));
        }

        Ok(Self {
            root,
            extension: extension.into(),
        })
    }

    /// Get the full path to a note.
    pub fn note_path(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }

    /// List all notes, relative to the vault root.
    ///
    /// Hidden files and directories are skipped. Notes are grouped by
    /// directory: ordered by directory first, then by file name.
    pub fn list_notes(&self) -> Result<Vec<PathBuf>> {
        let root = Pattern::escape(&self.root.to_string_lossy());
        let pattern = format!("{}/**/*.{}", root.trim_end_matches('/'), self.extension);

        let mut notes = Vec::new();
        for entry in glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    match path.strip_prefix(&self.root) {
                        Ok(relative) if !is_hidden(relative) => notes.push(relative.to_path_buf()),
                        Ok(_) => {}
                        Err(_) => warn!(
                            path = %path.display(),
                            root = %self.root.display(),
                            "Vault entry is outside the vault root"
                        ),
                    }
                }
                Err(e) => warn!(error = %e, "Skipping unreadable vault entry"),
            }
        }

        notes.sort_by(|a, b| {
            (a.parent(), a.file_name()).cmp(&(b.parent(), b.file_name()))
        });
        Ok(notes)
    }

    /// Publish every note in the vault.
    pub fn sync(
        &self,
        publisher: &Publisher<'_>,
        categories: &CategoryPlan,
        prompt: &mut dyn ContinuePrompt,
    ) -> Result<SyncSummary> {
        let notes = self.list_notes()?;
        info!(count = notes.len(), root = %self.root.display(), "Syncing vault");

        let files = notes.into_iter().map(|relative| {
            let category = categories.category_for(relative.parent().unwrap_or(Path::new("")));
            (self.note_path(&relative), category)
        });
        Ok(sync_files(publisher, files, prompt))
    }
}

fn is_hidden(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

/// Asked after a remote or index failure whether the sync should go on.
pub trait ContinuePrompt {
    fn should_continue(&mut self, path: &Path, error: &SyncError) -> bool;
}

impl<F> ContinuePrompt for F
where
    F: FnMut(&Path, &SyncError) -> bool,
{
    fn should_continue(&mut self, path: &Path, error: &SyncError) -> bool {
        self(path, error)
    }
}

/// Never stops the sync.
pub struct AlwaysContinue;

impl ContinuePrompt for AlwaysContinue {
    fn should_continue(&mut self, _path: &Path, _error: &SyncError) -> bool {
        true
    }
}

/// A note that could not be published.
#[derive(Debug, Clone, Serialize)]
pub struct FailedNote {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a sync run.
#[derive(Debug, Default, Serialize)]
pub struct SyncSummary {
    pub published: Vec<PublishReport>,
    pub failed: Vec<FailedNote>,
    /// Set when the operator declined to continue after a failure.
    pub aborted: bool,
}

impl SyncSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && !self.aborted
    }
}

/// Publish `files` in order, one at a time.
///
/// Local problems with a note (wrong file kind, unreadable file) are logged
/// and skipped. Remote and index failures are logged and then `prompt`
/// decides whether to go on; declining stops the loop, keeping whatever was
/// already published.
pub fn sync_files<I>(
    publisher: &Publisher<'_>,
    files: I,
    prompt: &mut dyn ContinuePrompt,
) -> SyncSummary
where
    I: IntoIterator<Item = (PathBuf, Option<i64>)>,
{
    let mut summary = SyncSummary::default();

    for (path, category) in files {
        let error = match publisher.publish(&path, category) {
            Ok(report) => {
                for failure in &report.tag_failures {
                    warn!(note = %report.title, tag = %failure.tag, "Tag left unchanged: {}", failure.error);
                }
                summary.published.push(report);
                continue;
            }
            Err(error) => error,
        };

        summary.failed.push(FailedNote {
            path: path.clone(),
            error: error.to_string(),
        });

        if !error.needs_confirmation() {
            warn!(path = %path.display(), %error, "Skipping note");
            continue;
        }

        error!(path = %path.display(), %error, "Failed to publish note");
        if error.is_unauthenticated() {
            error!("{}", CREDENTIALS_HINT);
        }
        if !prompt.should_continue(&path, &error) {
            warn!("Sync stopped by operator");
            summary.aborted = true;
            break;
        }
    }

    summary
}

/// Category id for each configured vault directory.
#[derive(Debug, Default, Clone)]
pub struct CategoryPlan {
    by_dir: BTreeMap<String, i64>,
}

impl CategoryPlan {
    /// Fetch site categories and resolve the `[categories]` table against
    /// them. Makes no remote call when the table is empty.
    pub fn fetch(config: &Config, api: &dyn ForumApi) -> Result<Self> {
        if config.categories.is_empty() {
            return Ok(Self::default());
        }
        let categories = Categories::from_site(api.fetch_site_categories()?);
        Ok(Self::resolve(&config.categories, &categories))
    }

    /// Unknown category names are dropped with a warning, so their notes
    /// go to the default category.
    pub fn resolve(mapping: &BTreeMap<String, String>, categories: &Categories) -> Self {
        let mut by_dir = BTreeMap::new();
        for (dir, name) in mapping {
            match categories.id_by_name(name) {
                Some(id) => {
                    by_dir.insert(dir_key(Path::new(dir)), id);
                }
                None => warn!(
                    directory = %dir,
                    category = %name,
                    "Unknown category, using the default category"
                ),
            }
        }
        Self { by_dir }
    }

    /// Category for notes in `relative_dir`; the nearest configured
    /// ancestor directory wins.
    pub fn category_for(&self, relative_dir: &Path) -> Option<i64> {
        relative_dir
            .ancestors()
            .find_map(|dir| self.by_dir.get(&dir_key(dir)).copied())
    }

    pub fn is_empty(&self) -> bool {
        self.by_dir.is_empty()
    }
}
