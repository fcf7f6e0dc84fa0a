//! Interactive continue/abort prompt for vault syncs.

use crate::error::SyncError;
use crate::vault::ContinuePrompt;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::Path;

const QUESTION: &str = "Would you like to continue with the syncing process?";

/// Asks on the terminal after each remote or index failure.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl ContinuePrompt for TerminalPrompt {
    fn should_continue(&mut self, path: &Path, error: &SyncError) -> bool {
        eprintln!("{}", failure_line(path, error));
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(QUESTION)
            .default(false)
            .interact_opt();
        accepted(answer)
    }
}

fn failure_line(path: &Path, error: &SyncError) -> String {
    format!("Failed to publish {}: {}", path.display(), error)
}

/// Only an explicit yes continues. Escape, `q` and a missing terminal stop.
fn accepted(answer: dialoguer::Result<Option<bool>>) -> bool {
    matches!(answer, Ok(Some(true)))
}
