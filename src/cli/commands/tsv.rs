//! `passnote copy-tsv` / `passnote paste-tsv` — tab-separated field transfer.

use std::fs;
use std::io::{self, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{node_path, open_database, Cli};
use crate::errors::{PassNoteError, Result};
use crate::tree::{copy_as_tsv, paste_as_tsv};

/// Execute the `copy-tsv` command.
pub fn execute_copy(cli: &Cli, path: &str) -> Result<()> {
    let db = open_database(cli)?;
    let indices = node_path(&db, path)?;
    let leaf = db
        .node_at(&indices)?
        .as_leaf()
        .ok_or_else(|| PassNoteError::InvalidOperation(format!("'{path}' is not a leaf")))?;

    print!("{}", copy_as_tsv(leaf).as_str());
    Ok(())
}

/// Execute the `paste-tsv` command.
pub fn execute_paste(cli: &Cli, path: &str, file: &str) -> Result<()> {
    let input = if file == "-" {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        Zeroizing::new(fs::read_to_string(file)?)
    };

    let mut db = open_database(cli)?;
    let indices = node_path(&db, path)?;
    let leaf = db
        .node_at_mut(&indices)?
        .as_leaf_mut()
        .ok_or_else(|| PassNoteError::InvalidOperation(format!("'{path}' is not a leaf")))?;

    let stats = paste_as_tsv(leaf, &input);
    if !stats.is_empty() {
        db.save()?;
    }

    output::print_stats(&stats);
    Ok(())
}
