//! Vaultcast - publish an Obsidian-style vault to a Discourse forum.
//!
//! # Overview
//!
//! Each note becomes one forum topic. Publishing a note:
//! - uploads `![[image.png]]` embeds and rewrites them as image markup
//! - turns `[[Other Note]]` links into links to the target's topic,
//!   creating a placeholder topic when the target was never published
//! - creates the topic, or updates its first post when the note was
//!   published before
//!
//! A local SQLite index remembers which title maps to which topic, so
//! repeated syncs update instead of duplicating.
//!
//! # Example
//!
//! ```no_run
//! use vaultcast::{AlwaysContinue, CategoryPlan, Config, DiscourseClient, LocalIndex, Publisher, Vault};
//!
//! let config = Config::load(None).unwrap();
//! let remote = config.remote_settings().unwrap();
//! let client = DiscourseClient::new(&remote).unwrap();
//! let index = LocalIndex::open(&config.db_path()).unwrap();
//!
//! let vault = Vault::new("/path/to/vault", "md").unwrap();
//! let settings = config.sync_settings(&remote, &vault.root);
//! let publisher = Publisher::new(&client, &index, &settings);
//!
//! let summary = vault
//!     .sync(&publisher, &CategoryPlan::default(), &mut AlwaysContinue)
//!     .unwrap();
//! println!("published {} notes", summary.published.len());
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod links;
pub mod note;
pub mod parser;
pub mod publish;
pub mod remote;
pub mod types;
pub mod vault;

// Re-export main types at crate root
pub use assets::AssetMigrator;
pub use config::{Config, SyncSettings};
pub use error::{Result, SyncError};
pub use index::{LocalIndex, NoteRecord};
pub use links::LinkResolver;
pub use note::Note;
pub use publish::Publisher;
pub use remote::{DiscourseClient, ForumApi, RemoteError};
pub use types::*;
pub use vault::{sync_files, AlwaysContinue, CategoryPlan, ContinuePrompt, SyncSummary, Vault};
