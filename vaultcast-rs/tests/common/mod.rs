//! Shared helpers for integration tests: an in-memory forum and a scratch vault.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use vaultcast::remote::{CreatedTopic, RemoteError, RemoteResult, SiteCategory, UploadedFile};
use vaultcast::{ForumApi, LocalIndex, SyncSettings};

pub const BASE_URL: &str = "https://forum.example.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { title: String, raw: String, category: i64 },
    Update { post_id: i64, raw: String },
    Upload { name: String },
    Categories,
}

/// Records every call; ids are handed out sequentially.
#[derive(Default)]
pub struct Forum {
    pub calls: RefCell<Vec<Call>>,
    pub categories: Vec<SiteCategory>,
    pub reject_uploads: HashSet<String>,
    pub reject_topics: HashSet<String>,
    pub unauthenticated: bool,
    next_id: Cell<i64>,
}

impl Forum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<i64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update { post_id, .. } => Some(post_id),
                _ => None,
            })
            .collect()
    }

    fn next(&self) -> i64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn auth(&self) -> RemoteResult<()> {
        if self.unauthenticated {
            return Err(RemoteError::Unauthenticated {
                message: "You are not permitted to view the requested resource.".to_string(),
            });
        }
        Ok(())
    }
}

impl ForumApi for Forum {
    fn create_topic(&self, title: &str, raw: &str, category: i64) -> RemoteResult<CreatedTopic> {
        self.calls.borrow_mut().push(Call::Create {
            title: title.to_string(),
            raw: raw.to_string(),
            category,
        });
        self.auth()?;
        if self.reject_topics.contains(title) {
            return Err(RemoteError::Unprocessable {
                message: "Title has already been used".to_string(),
            });
        }
        let id = self.next();
        Ok(CreatedTopic {
            id: id * 100,
            topic_id: id,
            topic_slug: title.to_lowercase().replace(' ', "-"),
        })
    }

    fn update_post(&self, post_id: i64, raw: &str) -> RemoteResult<()> {
        self.calls.borrow_mut().push(Call::Update {
            post_id,
            raw: raw.to_string(),
        });
        self.auth()
    }

    fn upload_file(&self, path: &Path) -> RemoteResult<UploadedFile> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.borrow_mut().push(Call::Upload { name: name.clone() });
        self.auth()?;
        if self.reject_uploads.contains(&name) {
            return Err(RemoteError::Unprocessable {
                message: "Sorry, you are not allowed to upload that file".to_string(),
            });
        }
        Ok(UploadedFile {
            short_url: format!("upload://asset{}.png", self.next()),
            original_filename: name,
        })
    }

    fn fetch_site_categories(&self) -> RemoteResult<Vec<SiteCategory>> {
        self.calls.borrow_mut().push(Call::Categories);
        self.auth()?;
        Ok(self.categories.clone())
    }
}

/// A temporary vault directory.
pub struct TestVault {
    pub dir: TempDir,
}

impl TestVault {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn settings(&self) -> SyncSettings {
        SyncSettings {
            base_url: BASE_URL.to_string(),
            default_category: 1,
            note_extension: "md".to_string(),
            asset_root: self.root().to_path_buf(),
            pacing: Duration::ZERO,
        }
    }
}

pub fn memory_index() -> LocalIndex {
    LocalIndex::open_in_memory().unwrap()
}

pub fn topic(slug: &str, id: i64) -> String {
    format!("{}/t/{}/{}", BASE_URL, slug, id)
}
