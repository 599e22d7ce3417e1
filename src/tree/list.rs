//! Sorted, case-insensitively unique collection used for holder children
//! and leaf fields.

use super::name::sealed::Rename;
use super::name::{compare_names, names_equal, Named};

/// Why a list operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// No item with the requested name.
    Missing,
    /// Another item already uses the name.
    Duplicate,
}

/// Items kept in ascending case-insensitive name order.
///
/// `insert` and `rename` keep the order incrementally; `sort` re-sorts
/// the whole list and is only needed after items were renamed in place
/// through `iter_mut`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedList<T> {
    items: Vec<T>,
}

impl<T> Default for NamedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Named> NamedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Index of the item called `name`, if any.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| names_equal(item.name(), name))
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.position(name).map(|index| &self.items[index])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let index = self.position(name)?;
        self.items.get_mut(index)
    }

    pub fn nth(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn nth_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Insert `item` at its sorted position and return that position.
    ///
    /// A case-insensitive duplicate hands the item back untouched.
    pub fn insert(&mut self, item: T) -> Result<usize, T> {
        if self.position(item.name()).is_some() {
            return Err(item);
        }
        Ok(self.insert_sorted(item))
    }

    fn insert_sorted(&mut self, item: T) -> usize {
        let index = self
            .items
            .partition_point(|existing| compare_names(existing.name(), item.name()).is_le());
        self.items.insert(index, item);
        index
    }

    /// Return the item called `name`, inserting `make()` first when missing.
    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> T) -> &mut T {
        let index = match self.position(name) {
            Some(index) => index,
            None => self.insert_sorted(make()),
        };
        &mut self.items[index]
    }

    /// Unlink and return the item called `name`.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let index = self.position(name)?;
        Some(self.items.remove(index))
    }

    /// Rename the item called `name` and move it to its new sorted slot.
    ///
    /// Renaming an item to a case variant of its own name is allowed.
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<usize, ListError> {
        let index = self.position(name).ok_or(ListError::Missing)?;
        if let Some(other) = self.position(new_name) {
            if other != index {
                return Err(ListError::Duplicate);
            }
        }

        let mut item = self.items.remove(index);
        item.set_name(new_name);
        Ok(self.insert_sorted(item))
    }

    /// Stable re-sort into ascending case-insensitive order.
    pub fn sort(&mut self) {
        self.items
            .sort_by(|a, b| compare_names(a.name(), b.name()));
    }

    /// Empty the list, handing back every item in order.
    pub fn take_items(&mut self) -> Vec<T> {
        std::mem::take(&mut self.items)
    }
}

impl<'a, T> IntoIterator for &'a NamedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
