//! In-memory forum used by unit tests.

use super::{CreatedTopic, ForumApi, RemoteError, RemoteResult, SiteCategory, UploadedFile};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForumCall {
    CreateTopic { title: String, raw: String, category: i64 },
    UpdatePost { post_id: i64, raw: String },
    Upload { path: PathBuf },
    FetchCategories,
}

#[derive(Default)]
pub struct FakeForum {
    pub calls: RefCell<Vec<ForumCall>>,
    pub categories: Vec<SiteCategory>,
    /// File names whose upload is rejected with an error payload.
    pub reject_uploads: HashSet<String>,
    /// Titles whose topic creation fails.
    pub reject_topics: HashSet<String>,
    pub unauthenticated: bool,
    next_id: Cell<i64>,
}

impl FakeForum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ForumCall> {
        self.calls.borrow().clone()
    }

    pub fn created_titles(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ForumCall::CreateTopic { title, .. } => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    fn bump(&self) -> i64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn check_auth(&self) -> RemoteResult<()> {
        if self.unauthenticated {
            Err(RemoteError::Unauthenticated {
                message: "invalid api key".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

impl ForumApi for FakeForum {
    fn create_topic(&self, title: &str, raw: &str, category: i64) -> RemoteResult<CreatedTopic> {
        self.calls.borrow_mut().push(ForumCall::CreateTopic {
            title: title.to_string(),
            raw: raw.to_string(),
            category,
        });
        self.check_auth()?;
        if self.reject_topics.contains(title) {
            return Err(RemoteError::Unprocessable {
                message: "Title has already been used".to_string(),
            });
        }
        let id = self.bump();
        Ok(CreatedTopic {
            id: id * 10,
            topic_id: id,
            topic_slug: slugify(title),
        })
    }

    fn update_post(&self, post_id: i64, raw: &str) -> RemoteResult<()> {
        self.calls.borrow_mut().push(ForumCall::UpdatePost {
            post_id,
            raw: raw.to_string(),
        });
        self.check_auth()
    }

    fn upload_file(&self, path: &Path) -> RemoteResult<UploadedFile> {
        self.calls.borrow_mut().push(ForumCall::Upload {
            path: path.to_path_buf(),
        });
        self.check_auth()?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.reject_uploads.contains(&name) {
            return Err(RemoteError::Unprocessable {
                message: "Sorry, the file you are trying to upload is too big".to_string(),
            });
        }
        let id = self.bump();
        Ok(UploadedFile {
            short_url: format!("upload://file{}.png", id),
            original_filename: name,
        })
    }

    fn fetch_site_categories(&self) -> RemoteResult<Vec<SiteCategory>> {
        self.calls.borrow_mut().push(ForumCall::FetchCategories);
        self.check_auth()?;
        Ok(self.categories.clone())
    }
}
