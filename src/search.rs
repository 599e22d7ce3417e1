//! Recursive search over node names, field names and field values.

use std::ops::{BitOr, BitOrAssign};

use zeroize::{Zeroize, Zeroizing};

use crate::tree::{Leaf, Named, Node};

/// Which parts of the tree a search looks at, plus how it compares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SearchOptions(u8);

impl SearchOptions {
    pub const NONE: Self = Self(0);
    pub const HOLDER_NAME: Self = Self(1);
    pub const LEAF_NAME: Self = Self(2);
    pub const FIELD_NAME: Self = Self(4);
    pub const FIELD_VALUE: Self = Self(8);
    /// Compare with blanks removed from both sides.
    pub const IGNORE_WHITESPACE: Self = Self(16);

    /// Every target, default comparison.
    pub const ALL: Self = Self(1 | 2 | 4 | 8);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 31)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` when no search target is selected.
    pub fn is_empty(self) -> bool {
        self.0 & Self::ALL.0 == 0
    }
}

impl BitOr for SearchOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SearchOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One hit: where it is, a readable label, and the field value for
/// field hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    path: Vec<usize>,
    breadcrumb: Zeroizing<String>,
    value: Option<Zeroizing<String>>,
}

impl SearchResult {
    /// Child indices from the search root to the matched node. For a
    /// field hit this is the path of the leaf holding the field.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Node names joined with `" > "`, ending in the field name for
    /// field hits.
    pub fn breadcrumb(&self) -> &str {
        &self.breadcrumb
    }

    /// The field's value, or `None` for a node-name hit.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().map(String::as_str)
    }

    /// `true` for field-name or field-value hits.
    pub fn is_field(&self) -> bool {
        self.value.is_some()
    }
}

/// Search the tree below `root` for `phrase`.
///
/// The walk is depth-first pre-order, holder children in their current
/// order. The root itself is never matched by name. No selected target
/// means no results.
pub fn search(root: &Node, options: SearchOptions, phrase: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();
    if options.is_empty() {
        return results;
    }

    let mut ctx = SearchContext {
        options,
        phrase,
        path: Vec::new(),
        breadcrumb: Zeroizing::new(String::new()),
        results: &mut results,
    };
    ctx.visit(root, true);
    results
}

struct SearchContext<'a> {
    options: SearchOptions,
    phrase: &'a str,
    path: Vec<usize>,
    breadcrumb: Zeroizing<String>,
    results: &'a mut Vec<SearchResult>,
}

impl SearchContext<'_> {
    fn visit(&mut self, node: &Node, is_root: bool) {
        let mark = self.breadcrumb.len();
        if !is_root {
            self.breadcrumb.push_str(" > ");
        }
        self.breadcrumb.push_str(node.name());

        let name_target = if node.is_leaf() {
            SearchOptions::LEAF_NAME
        } else {
            SearchOptions::HOLDER_NAME
        };
        if !is_root && self.options.contains(name_target) && self.matches(node.name()) {
            self.push_result(None);
        }

        match node {
            Node::Holder(holder) => {
                for (index, child) in holder.children().iter().enumerate() {
                    self.path.push(index);
                    self.visit(child, false);
                    self.path.pop();
                }
            }
            Node::Leaf(leaf) => self.visit_fields(leaf),
        }

        self.breadcrumb.truncate(mark);
    }

    fn visit_fields(&mut self, leaf: &Leaf) {
        let mark = self.breadcrumb.len();
        for field in leaf.fields() {
            let hit = (self.options.contains(SearchOptions::FIELD_NAME) && self.matches(field.name()))
                || (self.options.contains(SearchOptions::FIELD_VALUE)
                    && self.matches(field.value()));
            if hit {
                self.breadcrumb.push_str(" > ");
                self.breadcrumb.push_str(field.name());
                self.push_result(Some(field.value()));
                self.breadcrumb.truncate(mark);
            }
        }
    }

    fn push_result(&mut self, value: Option<&str>) {
        self.results.push(SearchResult {
            path: self.path.clone(),
            breadcrumb: Zeroizing::new(self.breadcrumb.as_str().to_string()),
            value: value.map(|v| Zeroizing::new(v.to_string())),
        });
    }

    fn matches(&self, haystack: &str) -> bool {
        if self.options.contains(SearchOptions::IGNORE_WHITESPACE) {
            contains_ignoring_blanks(haystack, self.phrase)
        } else {
            contains_ignore_case(haystack, self.phrase)
        }
    }
}

/// ASCII case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let mut haystack = haystack.to_ascii_lowercase();
    let mut needle = needle.to_ascii_lowercase();
    let found = haystack.contains(needle.as_str());
    haystack.zeroize();
    needle.zeroize();
    found
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Case-insensitive match that skips blanks on both sides.
///
/// Succeeds when, from some starting offset in `haystack`, the non-blank
/// bytes of `needle` equal the next non-blank bytes of `haystack` in order.
/// An empty haystack never matches.
pub fn contains_ignoring_blanks(haystack: &str, needle: &str) -> bool {
    let haystack = haystack.as_bytes();
    let needle: Zeroizing<Vec<u8>> = Zeroizing::new(
        needle
            .bytes()
            .filter(|&b| !is_blank(b))
            .map(|b| b.to_ascii_lowercase())
            .collect(),
    );

    (0..haystack.len()).any(|start| {
        let mut rest = haystack[start..]
            .iter()
            .filter(|&&b| !is_blank(b))
            .map(|b| b.to_ascii_lowercase());
        needle.iter().all(|&want| rest.next() == Some(want))
    })
}
