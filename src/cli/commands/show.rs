//! `passnote show` — print the tree, or one leaf's fields.

use crate::cli::output;
use crate::cli::{node_path, open_database, Cli};
use crate::errors::Result;
use crate::tree::Node;

/// Execute the `show` command.
pub fn execute(cli: &Cli, path: Option<&str>, reveal: bool) -> Result<()> {
    let db = open_database(cli)?;
    let indices = node_path(&db, path.unwrap_or(""))?;

    match db.node_at(&indices)? {
        Node::Leaf(leaf) => output::print_fields_table(leaf, reveal),
        holder => {
            output::print_tree(holder);
            if indices.is_empty() {
                let counts = holder.counts();
                output::info(&format!(
                    "{} holders, {} leaves, {} fields",
                    counts.holders, counts.leaves, counts.fields
                ));
            }
        }
    }

    Ok(())
}
