//! `passnote set` — add or update a field on a leaf.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{node_path, open_database, Cli};
use crate::crypto::{generate_password, SecretString};
use crate::errors::{PassNoteError, Result};
use crate::tree::{expand_field_name, trim_name, Field};

/// Length cap used by `set --generate`.
const GENERATED_MAX_LEN: usize = 20;

/// Execute the `set` command.
pub fn execute(cli: &Cli, path: &str, field: &str, value: Option<&str>, generate: bool) -> Result<()> {
    let field_name = expand_field_name(trim_name(field));
    if field_name.is_empty() {
        return Err(PassNoteError::InvalidOperation("field name cannot be empty".into()));
    }

    // Open first so a wrong path fails before asking for the value.
    let mut db = open_database(cli)?;
    let indices = node_path(&db, path)?;
    let leaf = db
        .node_at_mut(&indices)?
        .as_leaf_mut()
        .ok_or_else(|| PassNoteError::InvalidOperation(format!("'{path}' is not a leaf")))?;
    let leaf_name = leaf.name().to_string();

    let field_value = read_value(field_name, value, generate)?;

    let existed = leaf.find_field_by_name(field_name).is_some();
    if existed {
        leaf.edit_field(field_name, &field_value)?;
    } else {
        leaf.append_field(Field::new(field_name, &field_value))?;
    }
    db.save()?;

    let op = if existed { "updated in" } else { "added to" };
    output::success(&format!("Field '{field_name}' {op} '{leaf_name}'"));
    if generate {
        output::tip(&format!("Run `passnote show {path} --reveal` to see it."));
    }

    Ok(())
}

/// Determine the field value from one of four sources.
fn read_value(field_name: &str, value: Option<&str>, generate: bool) -> Result<SecretString> {
    if generate {
        // Source 1: Generated password.
        return generate_password(GENERATED_MAX_LEN);
    }

    if let Some(v) = value {
        // Source 2: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        // Source 3: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim_end().to_string()));
    }

    // Source 4: Interactive secure prompt.
    let v = dialoguer::Password::new()
        .with_prompt(format!("Enter value for {field_name}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| PassNoteError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(v))
}
