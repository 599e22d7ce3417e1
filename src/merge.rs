//! Structural merge of one tree into another.
//!
//! Merging only ever adds nodes and fields or overwrites field values;
//! nothing present only in the target is removed. Nodes are paired by
//! case-insensitive name at each level.

use std::mem;

use tracing::debug;

use crate::tree::{Holder, Leaf, Named, Node, Stats};

/// Merge `source` into `target`, consuming `source`.
///
/// Rules, applied to each pair of same-named nodes:
/// - leaf target, holder source: the holder takes the leaf's place and the
///   old leaf is merged back into it as a child.
/// - holder target, leaf source: the leaf is merged into the target's
///   child of the same name, created empty if missing.
/// - two leaves: for each source field, a same-named target field takes the
///   source value only when the source is strictly newer (equal timestamps
///   keep the target); missing fields are moved over.
/// - two holders: children are merged pairwise; source-only children are
///   moved over.
pub fn merge(target: &mut Node, source: Node) -> Stats {
    let mut stats = Stats::default();
    merge_node(target, source, &mut stats);
    debug!(?stats, "merged trees");
    stats
}

fn merge_node(target: &mut Node, source: Node, stats: &mut Stats) {
    match source {
        Node::Holder(source_holder) => {
            if target.is_leaf() {
                let old = mem::replace(target, Node::Holder(source_holder));
                merge_node(target, old, stats);
            } else if let Node::Holder(target_holder) = target {
                merge_children(target_holder, source_holder, stats);
            }
        }
        Node::Leaf(source_leaf) => match target {
            Node::Leaf(target_leaf) => merge_fields(target_leaf, source_leaf, stats),
            Node::Holder(target_holder) => {
                let name = source_leaf.name().to_string();
                let found = target_holder
                    .children_mut()
                    .get_or_insert_with(&name, || Node::new_leaf(&name));
                merge_node(found, Node::Leaf(source_leaf), stats);
            }
        },
    }
}

fn merge_children(target: &mut Holder, mut source: Holder, stats: &mut Stats) {
    for child in source.children_mut().take_items() {
        match target.find_child_by_name_mut(child.name()) {
            Some(existing) => merge_node(existing, child, stats),
            None => {
                let is_leaf = child.is_leaf();
                if target.append_child(child).is_ok() {
                    if is_leaf {
                        stats.leaves_added += 1;
                    } else {
                        stats.holders_added += 1;
                    }
                }
            }
        }
    }
}

fn merge_fields(target: &mut Leaf, mut source: Leaf, stats: &mut Stats) {
    for field in source.fields_mut().take_items() {
        match target.find_field_by_name_mut(field.name()) {
            Some(existing) => {
                if field.modified() > existing.modified() {
                    existing.adopt(field);
                    stats.fields_updated += 1;
                }
            }
            None => {
                if target.append_field(field).is_ok() {
                    stats.fields_added += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Field;

    fn leaf(name: &str, fields: &[(&str, &str, i64)]) -> Leaf {
        let mut leaf = Leaf::new(name);
        for (n, v, m) in fields {
            leaf.append_field(Field::with_modified(n, v, *m)).unwrap();
        }
        leaf
    }

    fn sample() -> Node {
        let mut root = Holder::new("Root");
        let mut bank = Holder::new("Bank");
        bank.append_child(leaf("Savings", &[("user", "alice", 10), ("pass", "p1", 10)]).into())
            .unwrap();
        root.append_child(bank.into()).unwrap();
        root.append_child(leaf("Mail", &[("user", "a@x", 10)]).into())
            .unwrap();
        root.into()
    }

    #[test]
    fn merging_a_copy_changes_nothing() {
        let mut tree = sample();
        let stats = merge(&mut tree, sample());
        assert!(stats.is_empty());
        assert_eq!(tree, sample());
    }

    #[test]
    fn newer_field_wins_and_ties_keep_target() {
        let mut target: Node = leaf("L", &[("a", "old", 10), ("b", "keep", 10)]).into();
        let source: Node = leaf("L", &[("A", "new", 11), ("B", "lose", 10), ("c", "added", 1)]).into();

        let stats = merge(&mut target, source);
        assert_eq!(stats.fields_updated, 1);
        assert_eq!(stats.fields_added, 1);

        let merged = target.as_leaf().unwrap();
        let a = merged.find_field_by_name("a").unwrap();
        assert_eq!((a.name(), a.value(), a.modified()), ("a", "new", 11));
        assert_eq!(merged.find_field_by_name("b").unwrap().value(), "keep");
        assert_eq!(merged.find_field_by_name("c").unwrap().value(), "added");
    }

    #[test]
    fn older_field_is_ignored() {
        let mut target: Node = leaf("L", &[("a", "current", 10)]).into();
        let stats = merge(&mut target, leaf("L", &[("a", "stale", 9)]).into());
        assert!(stats.is_empty());
        assert_eq!(
            target.as_leaf().unwrap().find_field_by_name("a").unwrap().value(),
            "current"
        );
    }

    #[test]
    fn new_children_are_counted_by_kind() {
        let mut target = sample();
        let mut source = Holder::new("root");
        let mut work = Holder::new("Work");
        work.append_child(Node::new_leaf("VPN")).unwrap();
        source.append_child(work.into()).unwrap();
        source.append_child(Node::new_leaf("Forum")).unwrap();

        let stats = merge(&mut target, source.into());
        assert_eq!(stats.holders_added, 1);
        assert_eq!(stats.leaves_added, 1);
        let root = target.as_holder().unwrap();
        assert_eq!(root.len(), 4);
        assert!(root.find_child_by_name("work").is_some());
    }

    #[test]
    fn holder_source_promotes_leaf_target() {
        let mut target: Node = leaf("Shop", &[("user", "me", 5)]).into();
        let mut source = Holder::new("Shop");
        source.append_child(Node::new_leaf("Other")).unwrap();

        let stats = merge(&mut target, source.into());
        let holder = target.as_holder().expect("target promoted to holder");
        assert_eq!(holder.len(), 2);
        let kept = holder.find_child_by_name("shop").unwrap().as_leaf().unwrap();
        assert_eq!(kept.find_field_by_name("user").unwrap().value(), "me");
        assert_eq!(stats.fields_added, 1);
    }

    #[test]
    fn leaf_source_merges_into_holder_child() {
        let mut target = sample();
        let stats = merge(&mut target, leaf("Mail", &[("user", "b@x", 20)]).into());
        assert_eq!(stats.fields_updated, 1);
        let mail = target
            .as_holder()
            .unwrap()
            .find_child_by_name("mail")
            .unwrap()
            .as_leaf()
            .unwrap();
        assert_eq!(mail.find_field_by_name("user").unwrap().value(), "b@x");
    }

    #[test]
    fn leaf_source_creates_missing_child() {
        let mut target: Node = Holder::new("Root").into();
        let stats = merge(&mut target, leaf("New", &[("k", "v", 1)]).into());
        assert_eq!(stats.fields_added, 1);
        assert_eq!(stats.leaves_added, 0);
        assert!(target.as_holder().unwrap().find_child_by_name("new").is_some());
    }
}
