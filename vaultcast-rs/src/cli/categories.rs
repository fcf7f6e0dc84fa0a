//! `categories` command.

use crate::cli::output::{ListResponse, Output};
use crate::error::{ExitCode, Result};
use crate::remote::{Categories, Category, ForumApi};

pub fn run(api: &dyn ForumApi, output: &Output) -> Result<ExitCode> {
    output.print(&ListResponse::new(list(api)?))?;
    Ok(ExitCode::Success)
}

fn list(api: &dyn ForumApi) -> Result<Vec<Category>> {
    let categories = Categories::from_site(api.fetch_site_categories()?);
    Ok(categories.iter().cloned().collect())
}
