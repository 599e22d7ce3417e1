//! JSON exchange format for trees.
//!
//! Holders are `{"leaf": false, "name": ..., "children": [...]}` and leaves
//! are `{"leaf": true, "name": ..., "fields": [{"name", "value", "modified"}]}`
//! with `modified` in Unix seconds.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::secure::SecretString;
use crate::errors::{PassNoteError, Result};
use crate::tree::{Field, Holder, Leaf, Named, Node};

#[derive(Serialize, Deserialize)]
struct JsonNode {
    leaf: bool,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<JsonNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<JsonField>>,
}

#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct JsonField {
    name: String,
    value: String,
    modified: i64,
}

/// Render a tree as pretty-printed JSON.
pub fn to_json(root: &Node) -> Result<SecretString> {
    let json = serde_json::to_string_pretty(&export_node(root))
        .map_err(|e| PassNoteError::SerializationError(format!("tree to JSON: {e}")))?;
    Ok(Zeroizing::new(json))
}

/// Build a tree from JSON produced by `to_json` (or the same shape).
///
/// Names are trimmed and siblings sorted as with any other insert; a
/// case-insensitive duplicate is an error.
pub fn from_json(json: &str) -> Result<Node> {
    let parsed: JsonNode = serde_json::from_str(json)
        .map_err(|e| PassNoteError::SerializationError(format!("JSON to tree: {e}")))?;
    import_node(&parsed)
}

fn export_node(node: &Node) -> JsonNode {
    match node {
        Node::Holder(holder) => JsonNode {
            leaf: false,
            name: holder.name().to_string(),
            children: Some(holder.children().iter().map(export_node).collect()),
            fields: None,
        },
        Node::Leaf(leaf) => JsonNode {
            leaf: true,
            name: leaf.name().to_string(),
            children: None,
            fields: Some(
                leaf.fields()
                    .iter()
                    .map(|field| JsonField {
                        name: field.name().to_string(),
                        value: field.value().to_string(),
                        modified: field.modified(),
                    })
                    .collect(),
            ),
        },
    }
}

fn import_node(json: &JsonNode) -> Result<Node> {
    if json.leaf {
        let mut leaf = Leaf::new(&json.name);
        for field in json.fields.iter().flatten() {
            leaf.append_field(Field::with_modified(&field.name, &field.value, field.modified))
                .map_err(|e| PassNoteError::SerializationError(e.to_string()))?;
        }
        Ok(leaf.into())
    } else {
        let mut holder = Holder::new(&json.name);
        for child in json.children.iter().flatten() {
            holder
                .append_child(import_node(child)?)
                .map_err(|e| PassNoteError::SerializationError(e.to_string()))?;
        }
        Ok(holder.into())
    }
}

impl Drop for JsonNode {
    fn drop(&mut self) {
        self.name.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let mut root = Holder::new("Root");
        let mut leaf = Leaf::new("Mail");
        leaf.append_field(Field::with_modified("user", "bob", 1_700_000_000))
            .unwrap();
        root.append_child(leaf.into()).unwrap();
        root.append_child(Node::new_holder("Empty")).unwrap();
        let tree: Node = root.into();

        let json = to_json(&tree).unwrap();
        assert!(json.contains("\"modified\": 1700000000"));
        assert_eq!(from_json(&json).unwrap(), tree);
    }

    #[test]
    fn missing_lists_mean_empty() {
        let tree = from_json(r#"{"leaf": false, "name": "R", "children": [{"leaf": true, "name": "L"}]}"#)
            .unwrap();
        let holder = tree.as_holder().unwrap();
        assert!(holder.get_nth_node(0).unwrap().as_leaf().unwrap().is_empty());
    }

    #[test]
    fn duplicate_children_are_rejected() {
        let json = r#"{"leaf": false, "name": "R", "children": [
            {"leaf": true, "name": "a"}, {"leaf": false, "name": "A", "children": []}]}"#;
        assert!(matches!(
            from_json(json),
            Err(PassNoteError::SerializationError(_))
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(from_json("{\"leaf\": true").is_err());
    }
}
