//! Boundary to the remote forum.
//!
//! Everything the sync engine needs from Discourse goes through [`ForumApi`],
//! so the engine can run against the HTTP client in production and against
//! an in-memory fake in tests.

mod category;
mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod types;

pub use category::{Categories, Category};
pub use client::DiscourseClient;
pub use error::{classify, is_success, ErrorPayload, RemoteError};
pub use types::{topic_url, CreatedTopic, SiteCategory, UploadedFile};

use std::path::Path;

/// Result type for forum calls.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Operations the sync engine performs against the forum.
pub trait ForumApi {
    /// Create a new topic whose first post has `raw` as its body.
    fn create_topic(&self, title: &str, raw: &str, category: i64) -> RemoteResult<CreatedTopic>;

    /// Replace the body of an existing post.
    fn update_post(&self, post_id: i64, raw: &str) -> RemoteResult<()>;

    /// Upload a local file as a composer attachment.
    fn upload_file(&self, path: &Path) -> RemoteResult<UploadedFile>;

    /// List the site's categories.
    fn fetch_site_categories(&self) -> RemoteResult<Vec<SiteCategory>>;
}
