//! In-memory credential tree.
//!
//! This module provides:
//! - `Node`, `Holder` and `Leaf` (`node`)
//! - `Field` and the one-letter field shortcuts (`field`)
//! - The sorted, case-insensitively unique sibling list (`list`)
//! - Name trimming and comparison rules (`name`)
//! - Change counters (`stats`)
//! - `/`-separated name paths (`path`)
//! - Tab-separated copy/paste (`tsv`)

pub mod field;
pub mod list;
pub mod name;
pub mod node;
pub mod path;
pub mod stats;
pub mod tsv;

pub use field::{expand_field_name, Field};
pub use list::NamedList;
pub use name::{compare_names, trim_name, Named};
pub use node::{Holder, Leaf, Node};
pub use path::{resolve_names, split_path};
pub use stats::{Stats, TreeCounts};
pub use tsv::{copy_as_tsv, paste_as_tsv};
