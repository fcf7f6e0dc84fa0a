//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vaultcast")]
#[command(author, version, about = "Publish an Obsidian vault to a Discourse forum", long_about = None)]
pub struct Cli {
    /// Path to the config file (overrides VAULTCAST_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the vault (overrides config default)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Keep syncing after remote errors without asking
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }

    /// Log filter used when RUST_LOG is not set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish every note in the vault
    Sync(SyncArgs),

    /// Publish a single note
    Publish(PublishArgs),

    /// Show the index record for a note title
    #[command(name = "note-info")]
    NoteInfo(NoteInfoArgs),

    /// Local index commands
    Index(IndexArgs),

    /// List the forum's categories
    Categories,
}

#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// Vault root to sync (defaults to --vault or the configured vault)
    pub root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct PublishArgs {
    /// Note file to publish
    pub file: PathBuf,

    /// Category for a newly created topic, e.g. "Notes/Rust"
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Parser, Debug)]
pub struct NoteInfoArgs {
    /// Note title (file name without extension)
    pub title: String,
}

#[derive(Parser, Debug)]
pub struct IndexArgs {
    #[command(subcommand)]
    pub command: IndexCommands,
}

#[derive(Subcommand, Debug)]
pub enum IndexCommands {
    /// List every recorded note
    List,
}
