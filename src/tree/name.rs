//! Name rules shared by nodes and fields.
//!
//! Names are trimmed of blanks, tabs, carriage returns and newlines on
//! both ends. Comparison is ASCII case-insensitive, byte by byte, which
//! gives the same order as C `strcasecmp`.

use std::cmp::Ordering;

/// Anything that lives in a `NamedList`.
///
/// Names are read-only outside this crate. A sibling can only be renamed
/// through its parent, which keeps the list sorted and unique:
///
/// ```compile_fail
/// use passnote::tree::{Holder, Named, Node};
///
/// let mut holder = Holder::new("Root");
/// holder.append_child(Node::new_leaf("a")).unwrap();
/// holder.find_child_by_name_mut("a").unwrap().set_name("B");
/// ```
pub trait Named: sealed::Rename {
    fn name(&self) -> &str;
}

pub(crate) mod sealed {
    pub trait Rename {
        /// Replace the name. Callers re-position the item afterwards.
        fn set_name(&mut self, name: &str);
    }
}

fn is_trimmable(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Strip leading and trailing blanks, tabs, CRs and LFs.
pub fn trim_name(raw: &str) -> &str {
    raw.trim_matches(is_trimmable)
}

/// Case-insensitive ordering of two names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(b.bytes().map(|b| b.to_ascii_lowercase()))
}

/// Case-insensitive equality of two names.
pub fn names_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_strips_only_blank_characters() {
        assert_eq!(trim_name("  \t Bank \r\n"), "Bank");
        assert_eq!(trim_name("a b"), "a b");
        assert_eq!(trim_name("\u{a0}x"), "\u{a0}x");
        assert_eq!(trim_name(" \n "), "");
    }

    #[test]
    fn compare_ignores_ascii_case() {
        assert_eq!(compare_names("bank", "BANK"), Ordering::Equal);
        assert_eq!(compare_names("Apple", "banana"), Ordering::Less);
        assert_eq!(compare_names("zeta", "Alpha"), Ordering::Greater);
        assert_eq!(compare_names("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn underscore_sorts_before_letters() {
        // Letters are lowered before comparing, so '_' (0x5f) < 'a' (0x61).
        assert_eq!(compare_names("_x", "A"), Ordering::Less);
    }
}
