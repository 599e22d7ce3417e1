//! `passnote add-holder` / `passnote add-leaf` — create nodes.

use crate::cli::output;
use crate::cli::{node_path, open_database, Cli};
use crate::errors::{PassNoteError, Result};
use crate::tree::{trim_name, Named, Node};

/// Execute the `add-holder` command.
pub fn execute_holder(cli: &Cli, parent: &str, name: &str) -> Result<()> {
    add_node(cli, parent, Node::new_holder(name))
}

/// Execute the `add-leaf` command.
pub fn execute_leaf(cli: &Cli, parent: &str, name: &str) -> Result<()> {
    add_node(cli, parent, Node::new_leaf(name))
}

fn add_node(cli: &Cli, parent: &str, node: Node) -> Result<()> {
    if trim_name(node.name()).is_empty() {
        return Err(PassNoteError::InvalidOperation("name cannot be empty".into()));
    }
    let kind = if node.is_leaf() { "Leaf" } else { "Holder" };
    let mut db = open_database(cli)?;
    let indices = node_path(&db, parent)?;

    let holder = db
        .node_at_mut(&indices)?
        .as_holder_mut()
        .ok_or_else(|| PassNoteError::InvalidOperation(format!("'{parent}' is a leaf")))?;
    let position = holder.append_child(node)?;
    let name = holder
        .get_nth_node(position)
        .map(|n| n.name().to_string())
        .unwrap_or_default();
    db.save()?;

    output::success(&format!("{kind} '{name}' added"));
    Ok(())
}
