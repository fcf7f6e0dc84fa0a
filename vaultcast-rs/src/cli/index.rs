//! Local index commands: `note-info` and `index list`.

use crate::cli::output::{ListResponse, Output};
use crate::error::{ExitCode, Result, SyncError};
use crate::index::{LocalIndex, NoteRecord};

/// Print the index record for `title`.
pub fn note_info(index: &LocalIndex, title: &str, output: &Output) -> Result<ExitCode> {
    let record = find(index, title)?;
    output.print(&record)?;
    Ok(ExitCode::Success)
}

/// Print every index record.
pub fn list(index: &LocalIndex, output: &Output) -> Result<ExitCode> {
    output.print(&ListResponse::new(index.records()?))?;
    Ok(ExitCode::Success)
}

fn find(index: &LocalIndex, title: &str) -> Result<NoteRecord> {
    index
        .lookup(title)?
        .ok_or_else(|| SyncError::NoteNotFound(title.to_string()))
}
