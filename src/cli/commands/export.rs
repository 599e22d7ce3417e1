//! `passnote export` — save one branch as a database file of its own.
//!
//! The new file is encrypted with a freshly chosen password, or stored
//! unencrypted with `--plain`.

use std::path::Path;

use crate::cli::output;
use crate::cli::{node_path, open_database, prompt_new_password, Cli};
use crate::errors::{PassNoteError, Result};
use crate::tree::Named;

/// Execute the `export` command.
pub fn execute(cli: &Cli, path: &str, file: &str) -> Result<()> {
    let out = Path::new(file);
    if out.exists() {
        return Err(PassNoteError::DatabaseAlreadyExists(out.to_path_buf()));
    }

    let db = open_database(cli)?;
    let indices = node_path(&db, path)?;
    let name = db.node_at(&indices)?.name().to_string();

    output::info("Choose a password for the exported file.");
    let password = prompt_new_password(cli)?;
    db.export_branch(&indices, out, &password)?;

    output::success(&format!("Exported '{name}' to {}", out.display()));
    Ok(())
}
