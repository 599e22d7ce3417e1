//! `passnote sort` — restore canonical order throughout the tree.

use crate::cli::output;
use crate::cli::{open_database, Cli};
use crate::errors::Result;

/// Execute the `sort` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut db = open_database(cli)?;
    db.root_mut().sort_tree();
    db.save()?;

    output::success("Tree sorted");
    Ok(())
}
