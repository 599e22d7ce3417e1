//! `passnote merge` — merge another database file into this one.

use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{node_path, open_database, prompt_password_with, Cli};
use crate::crypto::SecretString;
use crate::errors::Result;

/// Execute the `merge` command.
pub fn execute(cli: &Cli, file: &str, at: Option<&str>, source_plain: bool) -> Result<()> {
    let mut db = open_database(cli)?;
    let indices = node_path(&db, at.unwrap_or(""))?;

    let password = source_password(file, source_plain)?;
    let stats = db.merge_file(Path::new(file), &password, &indices)?;
    if !stats.is_empty() {
        db.save()?;
    }

    output::print_stats(&stats);
    Ok(())
}

/// Password for a second database file named on the command line.
pub(crate) fn source_password(file: &str, plain: bool) -> Result<SecretString> {
    if plain {
        return Ok(Zeroizing::new(String::new()));
    }
    prompt_password_with(&format!("Enter password for {file}"))
}
