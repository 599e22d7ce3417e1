//! `passnote init` — create a new, empty database.

use crate::cli::output;
use crate::cli::{database_path, load_settings, prompt_new_password, Cli};
use crate::errors::{PassNoteError, Result};
use crate::storage::Database;
use crate::tree::Named;

/// Execute the `init` command.
pub fn execute(cli: &Cli, root_name: &str) -> Result<()> {
    let path = database_path(cli)?;

    // 1. Refuse to overwrite an existing database.
    if path.exists() {
        output::tip("Use `passnote show` to look at the existing database.");
        return Err(PassNoteError::DatabaseAlreadyExists(path));
    }

    // 2. Prompt for a new password (with confirmation).
    let password = prompt_new_password(cli)?;
    if password.is_empty() {
        output::warning("Creating an unencrypted database.");
    }

    // 3. Create the file.
    let settings = load_settings()?;
    let db = Database::create(&path, &password, root_name, Some(&settings.storage_options()))?;

    output::success(&format!(
        "Database '{}' created at {}",
        db.root().name(),
        path.display()
    ));
    output::tip("Run `passnote add-holder / <NAME>` to add a folder.");
    output::tip("Run `passnote add-leaf / <NAME>` to add an entry.");

    Ok(())
}
