//! Name paths such as `Bank/Savings`, resolved to child indices.

use super::name::trim_name;
use super::node::Node;
use crate::errors::{PassNoteError, Result};

/// Split a `/`-separated path into trimmed, non-empty names.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/')
        .map(trim_name)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Turn a list of names below `root` into child indices.
///
/// Every name must match a child (case-insensitively) of the holder
/// reached so far; a name below a leaf is an error.
pub fn resolve_names(root: &Node, names: &[&str]) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(names.len());
    let mut node = root;

    for name in names {
        let holder = node.as_holder().ok_or_else(|| {
            PassNoteError::NodeNotFound(format!("{name} (parent is a leaf)"))
        })?;
        let index = holder
            .child_position(name)
            .ok_or_else(|| PassNoteError::NodeNotFound((*name).to_string()))?;
        indices.push(index);
        node = holder
            .get_nth_node(index)
            .ok_or_else(|| PassNoteError::NodeNotFound((*name).to_string()))?;
    }

    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Holder;

    #[test]
    fn split_ignores_empty_segments() {
        assert_eq!(split_path("/Bank// Savings /"), ["Bank", "Savings"]);
        assert!(split_path("/").is_empty());
    }

    #[test]
    fn resolve_finds_indices() {
        let mut root = Holder::new("Root");
        let mut bank = Holder::new("Bank");
        bank.append_child(Node::new_leaf("Savings")).unwrap();
        root.append_child(Node::new_leaf("Alpha")).unwrap();
        root.append_child(bank.into()).unwrap();
        let root = Node::from(root);

        assert_eq!(resolve_names(&root, &["bank", "SAVINGS"]).unwrap(), [1, 0]);
        assert!(resolve_names(&root, &[]).unwrap().is_empty());
        assert!(resolve_names(&root, &["nope"]).is_err());
        assert!(resolve_names(&root, &["alpha", "x"]).is_err());
    }
}
