//! Holders, leaves and the `Node` sum type that joins them.

use zeroize::Zeroizing;

use super::field::Field;
use super::list::{ListError, NamedList};
use super::name::sealed::Rename;
use super::name::{trim_name, Named};
use super::stats::TreeCounts;
use crate::errors::{PassNoteError, Result};

/// A tree node: either a container of nodes or a record of fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Holder(Holder),
    Leaf(Leaf),
}

/// Non-leaf node holding uniquely named children in sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct Holder {
    name: Zeroizing<String>,
    children: NamedList<Node>,
}

/// Leaf node holding uniquely named fields in sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    name: Zeroizing<String>,
    fields: NamedList<Field>,
}

fn owned_name(raw: &str) -> Zeroizing<String> {
    Zeroizing::new(trim_name(raw).to_string())
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

impl Node {
    pub fn new_holder(name: &str) -> Self {
        Node::Holder(Holder::new(name))
    }

    pub fn new_leaf(name: &str) -> Self {
        Node::Leaf(Leaf::new(name))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_holder(&self) -> Option<&Holder> {
        match self {
            Node::Holder(holder) => Some(holder),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_holder_mut(&mut self) -> Option<&mut Holder> {
        match self {
            Node::Holder(holder) => Some(holder),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Holder(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Holder(_) => None,
        }
    }

    /// Rename a node that has no parent (the tree root).
    ///
    /// Nodes inside a holder are renamed through `Holder::rename_node`
    /// so their position stays sorted.
    pub fn rename_root(&mut self, name: &str) {
        self.set_name(name);
    }

    /// Follow child indices from this node.
    ///
    /// Reaching a leaf ends the walk early and returns the leaf; an index
    /// past the end of a holder's children returns `None`.
    pub fn find_by_path(&self, path: &[usize]) -> Option<&Node> {
        let mut node = self;
        for &index in path {
            node = match node {
                Node::Holder(holder) => holder.children.nth(index)?,
                Node::Leaf(_) => return Some(node),
            };
        }
        Some(node)
    }

    /// Mutable form of `find_by_path`.
    pub fn find_by_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = self;
        for &index in path {
            match node {
                Node::Holder(holder) => node = holder.children.nth_mut(index)?,
                Node::Leaf(_) => break,
            }
        }
        Some(node)
    }

    /// Recursively re-sort every holder's children and every leaf's fields.
    pub fn sort_tree(&mut self) {
        match self {
            Node::Holder(holder) => holder.sort_tree(),
            Node::Leaf(leaf) => leaf.sort_fields(),
        }
    }

    /// Count holders, leaves and fields in this subtree.
    pub fn counts(&self) -> TreeCounts {
        let mut counts = TreeCounts::default();
        self.add_counts(&mut counts);
        counts
    }

    fn add_counts(&self, counts: &mut TreeCounts) {
        match self {
            Node::Holder(holder) => {
                counts.holders += 1;
                for child in holder.children() {
                    child.add_counts(counts);
                }
            }
            Node::Leaf(leaf) => {
                counts.leaves += 1;
                counts.fields += leaf.len();
            }
        }
    }
}

impl Named for Node {
    fn name(&self) -> &str {
        match self {
            Node::Holder(holder) => &holder.name,
            Node::Leaf(leaf) => &leaf.name,
        }
    }
}

impl Rename for Node {
    fn set_name(&mut self, name: &str) {
        match self {
            Node::Holder(holder) => holder.name = owned_name(name),
            Node::Leaf(leaf) => leaf.name = owned_name(name),
        }
    }
}

impl From<Holder> for Node {
    fn from(holder: Holder) -> Self {
        Node::Holder(holder)
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}

// ---------------------------------------------------------------------------
// Holder
// ---------------------------------------------------------------------------

impl Holder {
    pub fn new(name: &str) -> Self {
        Self {
            name: owned_name(name),
            children: NamedList::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &NamedList<Node> {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Insert `node` in sorted position and return that position.
    pub fn append_child(&mut self, node: Node) -> Result<usize> {
        self.children
            .insert(node)
            .map_err(|rejected| PassNoteError::NodeAlreadyExists(rejected.name().to_string()))
    }

    pub fn find_child_by_name(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn find_child_by_name_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    /// Current position of the child called `name`.
    pub fn child_position(&self, name: &str) -> Option<usize> {
        self.children.position(name)
    }

    pub fn get_nth_node(&self, index: usize) -> Option<&Node> {
        self.children.nth(index)
    }

    pub fn get_nth_node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.nth_mut(index)
    }

    /// Rename a child and return its new position.
    pub fn rename_node(&mut self, name: &str, new_name: &str) -> Result<usize> {
        let new_name = trim_name(new_name);
        self.children
            .rename(name, new_name)
            .map_err(|e| match e {
                ListError::Missing => PassNoteError::NodeNotFound(name.to_string()),
                ListError::Duplicate => PassNoteError::NodeAlreadyExists(new_name.to_string()),
            })
    }

    /// Remove a child and drop it with everything below it.
    pub fn delete_child(&mut self, name: &str) -> Result<()> {
        self.take_child(name)
            .map(drop)
            .ok_or_else(|| PassNoteError::NodeNotFound(name.to_string()))
    }

    /// Unlink a child and hand it to the caller.
    pub fn take_child(&mut self, name: &str) -> Option<Node> {
        self.children.remove(name)
    }

    /// Swap the child called `name` for `node`, returning the old child.
    ///
    /// If `node`'s name clashes with a different sibling nothing changes.
    pub fn replace_child(&mut self, name: &str, node: Node) -> Result<Node> {
        let old = self
            .children
            .remove(name)
            .ok_or_else(|| PassNoteError::NodeNotFound(name.to_string()))?;

        match self.children.insert(node) {
            Ok(_) => Ok(old),
            Err(rejected) => {
                let clash = rejected.name().to_string();
                // `old` was just removed, so its slot is free again.
                let _ = self.children.insert(old);
                Err(PassNoteError::NodeAlreadyExists(clash))
            }
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut NamedList<Node> {
        &mut self.children
    }

    pub fn sort_tree(&mut self) {
        self.children.sort();
        for child in self.children.iter_mut() {
            child.sort_tree();
        }
    }
}

// ---------------------------------------------------------------------------
// Leaf
// ---------------------------------------------------------------------------

impl Leaf {
    pub fn new(name: &str) -> Self {
        Self {
            name: owned_name(name),
            fields: NamedList::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &NamedList<Field> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Insert `field` in sorted position and return that position.
    pub fn append_field(&mut self, field: Field) -> Result<usize> {
        self.fields
            .insert(field)
            .map_err(|rejected| PassNoteError::FieldAlreadyExists(rejected.name().to_string()))
    }

    pub fn find_field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn find_field_by_name_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    pub fn get_nth_field(&self, index: usize) -> Option<&Field> {
        self.fields.nth(index)
    }

    pub fn get_nth_field_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.fields.nth_mut(index)
    }

    /// Rename a field and return its new position.
    pub fn rename_field(&mut self, name: &str, new_name: &str) -> Result<usize> {
        let new_name = trim_name(new_name);
        self.fields.rename(name, new_name).map_err(|e| match e {
            ListError::Missing => PassNoteError::FieldNotFound(name.to_string()),
            ListError::Duplicate => PassNoteError::FieldAlreadyExists(new_name.to_string()),
        })
    }

    /// Set a field's value, refreshing its timestamp.
    pub fn edit_field(&mut self, name: &str, value: &str) -> Result<()> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| PassNoteError::FieldNotFound(name.to_string()))?;
        field.edit(value);
        Ok(())
    }

    pub fn delete_field(&mut self, name: &str) -> Result<()> {
        self.take_field(name)
            .map(drop)
            .ok_or_else(|| PassNoteError::FieldNotFound(name.to_string()))
    }

    pub fn take_field(&mut self, name: &str) -> Option<Field> {
        self.fields.remove(name)
    }

    pub(crate) fn fields_mut(&mut self) -> &mut NamedList<Field> {
        &mut self.fields
    }

    pub fn sort_fields(&mut self) {
        self.fields.sort();
    }
}
