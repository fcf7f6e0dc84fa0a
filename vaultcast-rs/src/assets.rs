//! Asset migration: upload `![[image.png]]` embeds and rewrite them as
//! standard image markup pointing at the hosted copy.

use crate::error::{Result, SyncError};
use crate::parser::find_embeds;
use crate::remote::{ForumApi, UploadedFile};
use crate::types::{Rewrite, TagOutcome, TagRef};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Uploads embedded local files and rewrites their tags.
pub struct AssetMigrator<'a> {
    api: &'a dyn ForumApi,
    asset_root: PathBuf,
    pacing: Duration,
}

impl<'a> AssetMigrator<'a> {
    pub fn new(api: &'a dyn ForumApi, asset_root: impl Into<PathBuf>, pacing: Duration) -> Self {
        Self {
            api,
            asset_root: asset_root.into(),
            pacing,
        }
    }

    /// Rewrite every resolvable embed in `body`.
    ///
    /// Embeds are handled left to right. A tag that cannot be uploaded is
    /// kept exactly as written; the rest of the body is never touched.
    pub fn migrate(&self, body: &str) -> Rewrite {
        let embeds = find_embeds(body);
        debug!(count = embeds.len(), "Migrating embedded assets");

        let outcomes = embeds.iter().map(|tag| self.migrate_tag(body, tag)).collect();
        Rewrite::splice(body, &embeds, outcomes)
    }

    fn migrate_tag(&self, body: &str, tag: &TagRef) -> TagOutcome {
        let original = tag.raw(body).to_string();
        match self.upload(&tag.target) {
            Ok(file) => TagOutcome::Resolved {
                replacement: format!("![{}]({})", file.original_filename, file.short_url),
                original,
            },
            Err(error) => {
                warn!(tag = %original, line = tag.line, %error, "Error processing upload");
                TagOutcome::Unchanged { original, error }
            }
        }
    }

    fn upload(&self, name: &str) -> Result<UploadedFile> {
        let path = self.resolve_asset(name)?;
        info!("Uploading file '{}'", path.display());

        let uploaded = self.api.upload_file(&path);
        std::thread::sleep(self.pacing);
        Ok(uploaded?)
    }

    /// Absolute path of an embedded asset.
    ///
    /// Only plain relative names are accepted; absolute paths and `..`
    /// components would leave the asset root.
    pub fn resolve_asset(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(SyncError::Processing(format!(
                "Asset path escapes the asset root: {}",
                name
            )));
        }

        let path = self.asset_root.join(relative);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SyncError::Processing(format!(
                "Asset not found: {}",
                path.display()
            )))
        }
    }
}
