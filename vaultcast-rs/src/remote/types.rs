//! Payloads exchanged with the forum.

use serde::{Deserialize, Serialize};

/// Identifiers returned when a topic is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedTopic {
    /// Id of the first post; used for later edits.
    pub id: i64,
    pub topic_id: i64,
    pub topic_slug: String,
}

impl CreatedTopic {
    /// Canonical topic URL on the forum at `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        topic_url(base_url, &self.topic_slug, self.topic_id)
    }
}

/// Build a topic URL of the form `{base}/t/{slug}/{id}`.
pub fn topic_url(base_url: &str, slug: &str, topic_id: i64) -> String {
    format!("{}/t/{}/{}", base_url.trim_end_matches('/'), slug, topic_id)
}

/// A file hosted by the forum after upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// `upload://` style short URL usable in post markup.
    pub short_url: String,
    pub original_filename: String,
}

/// A category as listed by `GET /site.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub read_restricted: bool,
    #[serde(default)]
    pub parent_category_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SiteInfo {
    #[serde(default)]
    pub categories: Vec<SiteCategory>,
}

/// Raw upload response; Discourse reports per-file failures in `errors`.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}
