//! `publish` command.

use crate::cli::args::PublishArgs;
use crate::cli::output::Output;
use crate::cli::Session;
use crate::error::{ExitCode, Result, SyncError};
use crate::note::derive_title;
use crate::publish::Publisher;
use crate::remote::{Categories, ForumApi};
use crate::vault::CategoryPlan;
use std::path::{Path, PathBuf};

pub fn run(session: &Session, args: &PublishArgs, output: &Output) -> Result<ExitCode> {
    // Reject non-notes before any remote setup.
    derive_title(&args.file, &session.config.note_extension)?;

    // A lone note may live outside any configured vault; its directory
    // then serves as the asset root.
    let root = session
        .vault_root(None)
        .or_else(|_| note_dir(&args.file))?;

    let (client, remote) = session.connect()?;
    let index = session.open_index()?;
    let settings = session.config.sync_settings(&remote, &root);

    let category = match &args.category {
        Some(name) => Some(category_by_name(&client, name)?),
        None => {
            let plan = CategoryPlan::fetch(&session.config, &client)?;
            args.file
                .parent()
                .and_then(|dir| dir.strip_prefix(&root).ok())
                .and_then(|relative| plan.category_for(relative))
        }
    };

    let report = Publisher::new(&client, &index, &settings).publish(&args.file, category)?;
    for failure in &report.tag_failures {
        output.info(&format!("Left unchanged: {} ({})", failure.tag, failure.error));
    }
    output.print(&report)?;
    Ok(ExitCode::Success)
}

fn category_by_name(api: &dyn ForumApi, name: &str) -> Result<i64> {
    let categories = Categories::from_site(api.fetch_site_categories()?);
    categories.id_by_name(name).ok_or_else(|| {
        SyncError::Processing(format!(
            "Unknown category '{}'; known categories: {}",
            name,
            categories.names().join(", ")
        ))
    })
}

fn note_dir(file: &Path) -> Result<PathBuf> {
    let dir = file.parent().unwrap_or(Path::new("."));
    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    Ok(dir.to_path_buf())
}
