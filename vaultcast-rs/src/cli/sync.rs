//! `sync` command.

use crate::cli::args::SyncArgs;
use crate::cli::output::Output;
use crate::cli::prompt::TerminalPrompt;
use crate::cli::Session;
use crate::error::{ExitCode, Result, SyncError};
use crate::publish::Publisher;
use crate::vault::{AlwaysContinue, CategoryPlan, ContinuePrompt, SyncSummary, Vault};

pub fn run(session: &Session, args: &SyncArgs, output: &Output) -> Result<ExitCode> {
    let root = session.vault_root(args.root.as_deref())?;
    let vault = Vault::new(root, session.config.note_extension.clone())?;

    let (client, remote) = session.connect()?;
    let index = session.open_index()?;
    let settings = session.config.sync_settings(&remote, &vault.root);
    let publisher = Publisher::new(&client, &index, &settings);
    let categories = CategoryPlan::fetch(&session.config, &client)?;

    let mut always = AlwaysContinue;
    let mut terminal = TerminalPrompt::new();
    let confirm: &mut dyn ContinuePrompt = if session.assume_yes {
        &mut always
    } else {
        &mut terminal
    };

    let summary = vault.sync(&publisher, &categories, confirm)?;
    output.info(&format!(
        "Published {} notes, {} failed",
        summary.published.len(),
        summary.failed.len()
    ));
    output.print(&summary)?;

    outcome(&summary)
}

/// A declined prompt ends the run with [`SyncError::Aborted`] after the
/// partial summary has been printed.
fn outcome(summary: &SyncSummary) -> Result<ExitCode> {
    if summary.aborted {
        Err(SyncError::Aborted)
    } else if summary.failed.is_empty() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::GeneralError)
    }
}
