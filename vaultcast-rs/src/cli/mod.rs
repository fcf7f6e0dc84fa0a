//! CLI command implementations.

pub mod args;
pub mod output;
pub mod prompt;

pub mod categories;
pub mod index;
pub mod publish;
pub mod sync;

pub use args::{Cli, Commands};
pub use output::Output;

use crate::config::{Config, RemoteSettings};
use crate::error::Result;
use crate::index::LocalIndex;
use crate::remote::DiscourseClient;
use std::path::{Path, PathBuf};

/// What every command gets: the loaded config plus the global flags.
pub struct Session {
    pub config: Config,
    pub vault: Option<PathBuf>,
    pub assume_yes: bool,
}

impl Session {
    pub fn new(config: Config, cli: &Cli) -> Self {
        Self {
            config,
            vault: cli.vault.clone(),
            assume_yes: cli.yes,
        }
    }

    pub fn open_index(&self) -> Result<LocalIndex> {
        LocalIndex::open(&self.config.db_path())
    }

    /// Validate the remote settings and build a client from them.
    pub fn connect(&self) -> Result<(DiscourseClient, RemoteSettings)> {
        let settings = self.config.remote_settings()?;
        let client = DiscourseClient::new(&settings)?;
        Ok((client, settings))
    }

    /// Vault root: `explicit`, then `--vault`, then the config file.
    pub fn vault_root(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        self.config
            .resolve_vault_path(explicit.or(self.vault.as_deref()))
    }
}
