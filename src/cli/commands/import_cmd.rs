//! `passnote import` — add another database file as a new branch.

use std::path::Path;

use crate::cli::commands::merge::source_password;
use crate::cli::output;
use crate::cli::{node_path, open_database, Cli};
use crate::errors::Result;
use crate::tree::Named;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file: &str, at: Option<&str>, source_plain: bool) -> Result<()> {
    let mut db = open_database(cli)?;
    let indices = node_path(&db, at.unwrap_or(""))?;

    let password = source_password(file, source_plain)?;
    let position = db.import_branch(Path::new(file), &password, &indices)?;

    let mut branch_path = indices;
    branch_path.push(position);
    let branch = db.node_at(&branch_path)?;
    let name = branch.name().to_string();
    let counts = branch.counts();
    db.save()?;

    output::success(&format!(
        "Imported '{name}' ({} leaves, {} fields)",
        counts.leaves, counts.fields
    ));
    Ok(())
}
