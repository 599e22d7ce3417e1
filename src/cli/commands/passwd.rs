//! `passnote passwd` — change the master password.
//!
//! The tree is re-encrypted under a fresh salt and IV on save.

use crate::cli::output;
use crate::cli::{open_database, prompt_new_password, Cli};
use crate::errors::Result;

/// Execute the `passwd` command.
pub fn execute(cli: &Cli) -> Result<()> {
    // 1. Open with the current password.
    output::info("Enter your current database password.");
    let mut db = open_database(cli)?;

    // 2. Prompt for the new one and re-save.
    output::info("Choose your new database password.");
    let password = prompt_new_password(cli)?;
    db.set_password(&password);
    db.save()?;

    let counts = db.root().counts();
    output::success(&format!(
        "Password changed ({} leaves, {} fields re-encrypted)",
        counts.leaves, counts.fields
    ));
    Ok(())
}
