//! Configuration: a TOML file, secrets from the environment, CLI overrides.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "VAULTCAST_CONFIG";
/// Environment variable holding the forum API key.
pub const API_KEY_ENV: &str = "VAULTCAST_API_KEY";
/// Environment variable holding the forum API username.
pub const API_USERNAME_ENV: &str = "VAULTCAST_API_USERNAME";

/// User configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Forum base URL, e.g. `https://forum.example.com`.
    pub base_url: Option<String>,
    pub api_username: Option<String>,
    /// Never written back out; prefer the environment.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub vault_path: Option<PathBuf>,
    /// Where `![[image.png]]` embeds are looked up. Defaults to the vault root.
    pub asset_root: Option<PathBuf>,
    /// SQLite file for the local index.
    pub db_file: Option<PathBuf>,
    pub default_category: i64,
    /// Extension (without the dot) that marks a file as a note.
    pub note_extension: String,
    /// Delay after every remote write or upload.
    pub pacing_ms: u64,
    pub timeout_secs: u64,
    /// Vault-relative directory -> category name.
    pub categories: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            api_username: None,
            api_key: None,
            vault_path: None,
            asset_root: None,
            db_file: None,
            default_category: 1,
            note_extension: "md".to_string(),
            pacing_ms: 1000,
            timeout_secs: 30,
            categories: BTreeMap::new(),
        }
    }
}

/// Everything needed to talk to the forum.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: String,
    pub api_username: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// The settings the publish engine runs with, resolved from [`Config`].
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Forum base URL without trailing slash; topic URLs are built from it.
    pub base_url: String,
    pub default_category: i64,
    pub note_extension: String,
    pub asset_root: PathBuf,
    pub pacing: Duration,
}

impl Config {
    /// Resolve engine settings for a vault rooted at `vault_root`.
    pub fn sync_settings(&self, remote: &RemoteSettings, vault_root: &Path) -> SyncSettings {
        SyncSettings {
            base_url: remote.base_url.clone(),
            default_category: self.default_category,
            note_extension: self.note_extension.clone(),
            asset_root: self.asset_root(vault_root),
            pacing: self.pacing(),
        }
    }

    /// Load configuration.
    ///
    /// Lookup order: `explicit` path, `$VAULTCAST_CONFIG`, then
    /// `<config dir>/vaultcast/config.toml`. Falls back to defaults when no
    /// file exists. A `.env` file in the working directory is honoured.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Read a config file. The file must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay secrets from the environment; `lookup` is `std::env::var` in production.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(user) = lookup(API_USERNAME_ENV).filter(|u| !u.is_empty()) {
            self.api_username = Some(user);
        }
        self
    }

    /// Resolve the vault root, CLI override first.
    pub fn resolve_vault_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.vault_path.clone())
            .ok_or_else(|| {
                SyncError::Config("No vault path given (use --vault or set vault_path)".to_string())
            })
    }

    /// Directory used to resolve embedded assets.
    pub fn asset_root(&self, vault_root: &Path) -> PathBuf {
        self.asset_root
            .clone()
            .unwrap_or_else(|| vault_root.to_path_buf())
    }

    /// Location of the local index database.
    pub fn db_path(&self) -> PathBuf {
        self.db_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vaultcast")
                .join("index.sqlite3")
        })
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Check that everything needed for remote calls is present.
    pub fn remote_settings(&self) -> Result<RemoteSettings> {
        let base_url = self
            .base_url
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| SyncError::Config("base_url is not set".to_string()))?;
        let api_username = self.api_username.clone().ok_or_else(|| {
            SyncError::Config(format!("api_username is not set (or export {})", API_USERNAME_ENV))
        })?;
        let api_key = self.api_key.clone().ok_or_else(|| {
            SyncError::Config(format!("No API key found; export {} or add it to .env", API_KEY_ENV))
        })?;

        Ok(RemoteSettings {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_username,
            api_key,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

/// Key used in the `[categories]` table: `/`-separated, `.` for the vault root.
pub fn dir_key(relative_dir: &Path) -> String {
    let key = relative_dir
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if key.is_empty() { ".".to_string() } else { key }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vaultcast").join("config.toml"))
}
