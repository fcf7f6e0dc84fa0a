//! Link resolution: turn `[[Title]]` references into links to the
//! corresponding forum topics, creating placeholder topics on demand.

use crate::error::Result;
use crate::index::LocalIndex;
use crate::parser::find_links;
use crate::remote::ForumApi;
use crate::types::{Rewrite, TagOutcome, TagRef};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Body of a topic created for a title that has not been published yet.
pub fn placeholder_body(title: &str) -> String {
    format!("This is a placeholder topic for {}", title)
}

/// Resolves wikilinks through the local index.
pub struct LinkResolver<'a> {
    api: &'a dyn ForumApi,
    index: &'a LocalIndex,
    base_url: &'a str,
    placeholder_category: i64,
    pacing: Duration,
}

impl<'a> LinkResolver<'a> {
    pub fn new(
        api: &'a dyn ForumApi,
        index: &'a LocalIndex,
        base_url: &'a str,
        placeholder_category: i64,
        pacing: Duration,
    ) -> Self {
        Self {
            api,
            index,
            base_url,
            placeholder_category,
            pacing,
        }
    }

    /// Rewrite every resolvable link tag in `body`.
    pub fn resolve(&self, body: &str) -> Rewrite {
        let links = find_links(body);
        debug!(count = links.len(), "Resolving links");

        let outcomes = links.iter().map(|tag| self.resolve_tag(body, tag)).collect();
        Rewrite::splice(body, &links, outcomes)
    }

    fn resolve_tag(&self, body: &str, tag: &TagRef) -> TagOutcome {
        let original = tag.raw(body).to_string();
        match self.url_for(&tag.target) {
            Ok(url) => TagOutcome::Resolved {
                replacement: format!("[{}]({})", tag.display_text(), url),
                original,
            },
            Err(error) => {
                warn!(tag = %original, line = tag.line, %error, "Error processing link");
                TagOutcome::Unchanged { original, error }
            }
        }
    }

    /// Remote URL for `title`, creating a placeholder topic if it has none.
    ///
    /// The index is consulted on every call, so a placeholder created for an
    /// earlier tag (or an earlier note) is reused.
    pub fn url_for(&self, title: &str) -> Result<String> {
        let existing = self.index.lookup(title)?;
        if let Some(url) = existing.as_ref().and_then(|r| r.remote_url.clone()) {
            debug!(title, %url, "Link target already published");
            return Ok(url);
        }

        let has_unadjusted_links = existing.is_some_and(|r| r.has_unadjusted_links);
        self.create_placeholder(title, has_unadjusted_links)
    }

    fn create_placeholder(&self, title: &str, has_unadjusted_links: bool) -> Result<String> {
        info!("Creating placeholder topic for '{}'", title);
        let created = self
            .api
            .create_topic(title, &placeholder_body(title), self.placeholder_category);
        std::thread::sleep(self.pacing);

        let created = created?;
        let url = created.url(self.base_url);
        self.index
            .create_or_update(title, Some(&url), Some(created.id), has_unadjusted_links)?;
        Ok(url)
    }
}
