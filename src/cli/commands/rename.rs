//! `passnote rename` — rename a node or a field.

use crate::cli::output;
use crate::cli::{node_path, open_database, parent_path, Cli};
use crate::errors::{PassNoteError, Result};
use crate::tree::{split_path, trim_name};

/// Execute the `rename` command.
pub fn execute(cli: &Cli, path: &str, new_name: &str, field: Option<&str>) -> Result<()> {
    if trim_name(new_name).is_empty() {
        return Err(PassNoteError::InvalidOperation("name cannot be empty".into()));
    }

    let mut db = open_database(cli)?;

    if let Some(field) = field {
        let indices = node_path(&db, path)?;
        let leaf = db
            .node_at_mut(&indices)?
            .as_leaf_mut()
            .ok_or_else(|| PassNoteError::InvalidOperation(format!("'{path}' is not a leaf")))?;
        leaf.rename_field(field, new_name)?;
        db.save()?;
        output::success(&format!("Field '{field}' renamed to '{}'", trim_name(new_name)));
        return Ok(());
    }

    if split_path(path).is_empty() {
        db.root_mut().rename_root(new_name);
    } else {
        let (parent, name) = parent_path(&db, path)?;
        let holder = db
            .node_at_mut(&parent)?
            .as_holder_mut()
            .ok_or_else(|| PassNoteError::NodeNotFound(name.clone()))?;
        holder.rename_node(&name, new_name)?;
    }
    db.save()?;

    output::success(&format!("Renamed to '{}'", trim_name(new_name)));
    Ok(())
}
