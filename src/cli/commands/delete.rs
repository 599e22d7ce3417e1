//! `passnote delete` — remove a node or a field.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{node_path, open_database, parent_path, Cli};
use crate::errors::{PassNoteError, Result};
use crate::tree::Node;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, path: &str, field: Option<&str>, force: bool) -> Result<()> {
    let what = match field {
        Some(field) => format!("field '{field}' of '{path}'"),
        None => format!("'{path}'"),
    };

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete {what}?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut db = open_database(cli)?;

    if let Some(field) = field {
        let indices = node_path(&db, path)?;
        let leaf = db
            .node_at_mut(&indices)?
            .as_leaf_mut()
            .ok_or_else(|| PassNoteError::InvalidOperation(format!("'{path}' is not a leaf")))?;
        leaf.delete_field(field)?;
    } else {
        let (parent, name) = parent_path(&db, path)?;
        let holder = db
            .node_at_mut(&parent)?
            .as_holder_mut()
            .ok_or_else(|| PassNoteError::NodeNotFound(name.clone()))?;
        let removed = holder
            .take_child(&name)
            .ok_or_else(|| PassNoteError::NodeNotFound(name.clone()))?;
        if let Node::Holder(h) = &removed {
            if !h.is_empty() {
                let counts = removed.counts();
                output::info(&format!(
                    "Removed {} holders, {} leaves and {} fields with it",
                    counts.holders - 1,
                    counts.leaves,
                    counts.fields
                ));
            }
        }
    }
    db.save()?;

    output::success(&format!("Deleted {what}"));
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| PassNoteError::CommandFailed(format!("confirm prompt: {e}")))
}
