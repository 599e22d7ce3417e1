//! Tab-separated copy/paste of a leaf's fields.
//!
//! One `name<TAB>value` record per line. The `Session` field is never
//! exported.

use zeroize::Zeroizing;

use super::field::Field;
use super::name::{names_equal, trim_name, Named};
use super::node::Leaf;
use super::stats::Stats;
use crate::crypto::secure::SecretString;

const SKIPPED_FIELD: &str = "Session";

/// Render every field except `Session` as `name\tvalue\n`.
pub fn copy_as_tsv(leaf: &Leaf) -> SecretString {
    let mut out = Zeroizing::new(String::new());
    for field in leaf.fields() {
        if names_equal(field.name(), SKIPPED_FIELD) {
            continue;
        }
        out.push_str(field.name());
        out.push('\t');
        out.push_str(field.value());
        out.push('\n');
    }
    out
}

/// Apply TSV records to `leaf`.
///
/// Existing fields are edited when the pasted value differs, new names
/// are appended. Lines that are blank, have no tab, or have an empty name
/// or value are skipped.
pub fn paste_as_tsv(leaf: &mut Leaf, input: &str) -> Stats {
    let mut stats = Stats::default();

    for line in input.lines() {
        let Some((name, value)) = line.split_once('\t') else {
            continue;
        };
        let name = trim_name(name);
        let value = trim_name(value.trim_start_matches('\t'));
        if name.is_empty() || value.is_empty() {
            continue;
        }

        match leaf.find_field_by_name_mut(name) {
            Some(field) => {
                if field.value() != value {
                    field.edit(value);
                    stats.fields_updated += 1;
                }
            }
            None => {
                if leaf.append_field(Field::new(name, value)).is_ok() {
                    stats.fields_added += 1;
                }
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login() -> Leaf {
        let mut leaf = Leaf::new("Login");
        leaf.append_field(Field::with_modified("user", "alice", 5)).unwrap();
        leaf.append_field(Field::with_modified("pass", "secret1", 5)).unwrap();
        leaf.append_field(Field::with_modified("session", "tok", 5)).unwrap();
        leaf
    }

    #[test]
    fn copy_skips_session() {
        let tsv = copy_as_tsv(&login());
        assert_eq!(tsv.as_str(), "pass\tsecret1\nuser\talice\n");
    }

    #[test]
    fn paste_of_own_copy_changes_nothing() {
        let mut leaf = login();
        let tsv = copy_as_tsv(&leaf);
        let stats = paste_as_tsv(&mut leaf, &tsv);
        assert!(stats.is_empty());
        assert_eq!(leaf.find_field_by_name("pass").unwrap().modified(), 5);
    }

    #[test]
    fn paste_adds_and_updates() {
        let mut leaf = login();
        let stats = paste_as_tsv(&mut leaf, "newfield\tval\nuser\t\tbob\n");
        assert_eq!(stats.fields_added, 1);
        assert_eq!(stats.fields_updated, 1);
        assert_eq!(leaf.find_field_by_name("newfield").unwrap().value(), "val");
        assert_eq!(leaf.find_field_by_name("user").unwrap().value(), "bob");
    }

    #[test]
    fn paste_skips_malformed_lines() {
        let mut leaf = Leaf::new("x");
        let stats = paste_as_tsv(&mut leaf, "\n\nno tab here\n\tvalue only\nname only\t\n \t \r\nok\t1\r\n");
        assert_eq!(stats.fields_added, 1);
        assert_eq!(leaf.len(), 1);
        assert_eq!(leaf.find_field_by_name("ok").unwrap().value(), "1");
    }
}
