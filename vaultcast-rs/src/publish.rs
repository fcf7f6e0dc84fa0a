//! Publishing a single note: migrate assets, resolve links, then create or
//! update the remote topic and record the result in the local index.

use crate::assets::AssetMigrator;
use crate::config::SyncSettings;
use crate::error::Result;
use crate::index::{LocalIndex, NoteRecord};
use crate::links::LinkResolver;
use crate::note::Note;
use crate::remote::ForumApi;
use crate::types::{PublishAction, PublishReport, Rewrite, TagFailure};
use std::path::Path;
use tracing::{debug, info, warn};

/// Publishes notes to the forum.
pub struct Publisher<'a> {
    api: &'a dyn ForumApi,
    index: &'a LocalIndex,
    settings: &'a SyncSettings,
}

impl<'a> Publisher<'a> {
    pub fn new(api: &'a dyn ForumApi, index: &'a LocalIndex, settings: &'a SyncSettings) -> Self {
        Self {
            api,
            index,
            settings,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        self.settings
    }

    /// Publish the note at `path`. New topics go to `category`, or the
    /// default category when none is given.
    pub fn publish(&self, path: &Path, category: Option<i64>) -> Result<PublishReport> {
        let note = Note::load(path, &self.settings.note_extension)?;
        self.publish_note(&note, category)
    }

    /// Publish an already loaded note.
    pub fn publish_note(&self, note: &Note, category: Option<i64>) -> Result<PublishReport> {
        let existing = self.index.lookup(&note.title)?;

        match note.frontmatter() {
            Ok(Some(_)) => debug!(title = %note.title, "Note has frontmatter"),
            Ok(None) => {}
            Err(error) => warn!(title = %note.title, %error, "Ignoring unreadable frontmatter"),
        }

        let images = AssetMigrator::new(
            self.api,
            &self.settings.asset_root,
            self.settings.pacing,
        )
        .migrate(note.body());

        let links = LinkResolver::new(
            self.api,
            self.index,
            &self.settings.base_url,
            self.settings.default_category,
            self.settings.pacing,
        )
        .resolve(&images.body);

        // A self-link may have just created a placeholder for this very title.
        let existing = match existing {
            Some(record) => Some(record),
            None => self.index.lookup(&note.title)?,
        };

        let (action, remote_url, post_id) = match existing {
            Some(NoteRecord {
                remote_post_id: Some(post_id),
                remote_url,
                has_unadjusted_links,
                ..
            }) => {
                self.update(&note.title, post_id, &links.body)?;
                self.index.create_or_update(
                    &note.title,
                    remote_url.as_deref(),
                    Some(post_id),
                    has_unadjusted_links,
                )?;
                (PublishAction::Updated, remote_url, post_id)
            }
            _ => {
                let category = category.unwrap_or(self.settings.default_category);
                let (url, post_id) = self.create(&note.title, &links.body, category)?;
                self.index
                    .create_or_update(&note.title, Some(&url), Some(post_id), false)?;
                (PublishAction::Created, Some(url), post_id)
            }
        };

        info!(title = %note.title, ?action, "Published note");

        Ok(PublishReport {
            title: note.title.clone(),
            path: note.path.clone(),
            action,
            remote_url,
            post_id,
            images_uploaded: images.resolved_count(),
            links_resolved: links.resolved_count(),
            tag_failures: collect_failures(&[&images, &links]),
        })
    }

    fn create(&self, title: &str, body: &str, category: i64) -> Result<(String, i64)> {
        debug!(title, category, "Creating topic");
        let created = self.api.create_topic(title, body, category);
        std::thread::sleep(self.settings.pacing);

        let created = created?;
        Ok((created.url(&self.settings.base_url), created.id))
    }

    fn update(&self, title: &str, post_id: i64, body: &str) -> Result<()> {
        debug!(title, post_id, "Updating post");
        let updated = self.api.update_post(post_id, body);
        std::thread::sleep(self.settings.pacing);
        Ok(updated?)
    }
}

fn collect_failures(rewrites: &[&Rewrite]) -> Vec<TagFailure> {
    rewrites
        .iter()
        .flat_map(|r| r.failures())
        .map(|(tag, error)| TagFailure {
            tag: tag.to_string(),
            error: error.to_string(),
        })
        .collect()
}
