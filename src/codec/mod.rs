//! Packed-tree binary format.
//!
//! A packed tree has this layout:
//!
//! ```text
//! ["PASSNOTE": 8 bytes][root node record][0x00 x 8]
//! ```
//!
//! Node record: `[kind][sibling][name\0]` where `kind` is `h` (holder with
//! children), `e` (empty holder) or `l` (leaf) and `sibling` is `+` when
//! another record follows at the same level or `-` for the last one.
//! A holder is followed by its children; a leaf by its field records:
//!
//! ```text
//! ['f'][sibling][modified as lowercase hex\0][name\0][value\0]
//! ```
//!
//! The same stream is stored verbatim in plaintext databases and is the
//! exchange format for imported and exported branches.

pub mod json;

use tracing::debug;

use crate::crypto::secure::{SecretBytes, SecureBuf};
use crate::errors::{PassNoteError, Result};
use crate::tree::{Field, Holder, Leaf, Named, Node};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every packed tree.
pub const MAGIC: &[u8; 8] = b"PASSNOTE";

/// Zero bytes closing every packed tree.
pub const FOOTER: &[u8; 8] = &[0u8; 8];

const TAG_HOLDER: u8 = b'h';
const TAG_EMPTY_HOLDER: u8 = b'e';
const TAG_LEAF: u8 = b'l';
const TAG_FIELD: u8 = b'f';
const HAS_NEXT: u8 = b'+';
const LAST: u8 = b'-';

/// Deepest nesting accepted by both `pack` and `unpack`.
pub const MAX_DEPTH: usize = 256;

/// Longest accepted hex timestamp (64 bits).
const MAX_HEX_DIGITS: usize = 16;

// ---------------------------------------------------------------------------
// Pack
// ---------------------------------------------------------------------------

/// Serialize a tree into a packed byte stream.
///
/// Siblings are written in their current in-memory order. A tree nested
/// deeper than `MAX_DEPTH` is refused, since it could not be read back.
pub fn pack(root: &Node) -> Result<SecretBytes> {
    let mut buf = SecureBuf::with_capacity(256);
    buf.extend_from_slice(MAGIC);
    pack_node(&mut buf, root, false, 0)?;
    buf.extend_from_slice(FOOTER);

    debug!(bytes = buf.len(), "packed tree");
    Ok(buf.into_inner())
}

fn pack_node(buf: &mut SecureBuf, node: &Node, has_next: bool, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(too_deep());
    }

    match node {
        Node::Holder(holder) => {
            let kind = if holder.is_empty() {
                TAG_EMPTY_HOLDER
            } else {
                TAG_HOLDER
            };
            buf.extend_from_slice(&[kind, sibling_flag(has_next)]);
            push_str(buf, holder.name())?;

            let mut children = holder.children().iter().peekable();
            while let Some(child) = children.next() {
                pack_node(buf, child, children.peek().is_some(), depth + 1)?;
            }
        }
        Node::Leaf(leaf) => {
            buf.extend_from_slice(&[TAG_LEAF, sibling_flag(has_next)]);
            push_str(buf, leaf.name())?;

            let mut fields = leaf.fields().iter().peekable();
            while let Some(field) = fields.next() {
                pack_field(buf, field, fields.peek().is_some())?;
            }
        }
    }
    Ok(())
}

fn pack_field(buf: &mut SecureBuf, field: &Field, has_next: bool) -> Result<()> {
    buf.extend_from_slice(&[TAG_FIELD, sibling_flag(has_next)]);
    push_str(buf, &hex_timestamp(field.modified()))?;
    push_str(buf, field.name())?;
    push_str(buf, field.value())
}

/// Lowercase hex without padding, except that values with bit 31 set and
/// no higher bits get a ninth digit. Exactly eight digits are read back as
/// a sign-extended 32-bit value, as older files store negative times that
/// way.
fn hex_timestamp(modified: i64) -> String {
    if (0x8000_0000..=0xffff_ffff).contains(&modified) {
        format!("{modified:09x}")
    } else {
        format!("{modified:x}")
    }
}

fn sibling_flag(has_next: bool) -> u8 {
    if has_next {
        HAS_NEXT
    } else {
        LAST
    }
}

/// Append a NUL-terminated string.
fn push_str(buf: &mut SecureBuf, s: &str) -> Result<()> {
    if s.as_bytes().contains(&0) {
        return Err(PassNoteError::InvalidFormat(
            "names and values cannot contain NUL bytes".into(),
        ));
    }
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
    Ok(())
}

// ---------------------------------------------------------------------------
// Unpack
// ---------------------------------------------------------------------------

/// Parse a packed byte stream back into a tree.
///
/// The magic header is checked first, then the zero footer. A missing
/// footer is reported as `FooterMismatch` rather than `InvalidFormat`.
/// Siblings are inserted through the uniqueness-checked append, so a
/// stream with case-insensitive duplicates is rejected. On any error the
/// partly built tree is dropped.
pub fn unpack(data: &[u8]) -> Result<Node> {
    if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
        return Err(PassNoteError::InvalidFormat(
            "missing PASSNOTE magic header".into(),
        ));
    }
    if data.len() < MAGIC.len() + FOOTER.len() {
        return Err(PassNoteError::InvalidFormat("packed tree is truncated".into()));
    }
    if &data[data.len() - FOOTER.len()..] != FOOTER {
        return Err(PassNoteError::FooterMismatch);
    }

    let body = &data[MAGIC.len()..data.len() - FOOTER.len()];
    let mut reader = Reader::new(body);
    let (root, _) = reader.node(0)?;

    if !reader.is_at_end() {
        return Err(PassNoteError::InvalidFormat(format!(
            "{} unexpected bytes after root node",
            reader.remaining()
        )));
    }

    debug!(bytes = data.len(), "unpacked tree");
    Ok(root)
}

/// Cursor over the record area of a packed tree.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn tag(&mut self) -> Result<(u8, bool)> {
        let bytes = self
            .data
            .get(self.pos..self.pos + 2)
            .ok_or_else(|| truncated("record tag"))?;
        self.pos += 2;
        Ok((bytes[0], bytes[1] == HAS_NEXT))
    }

    /// Read a NUL-terminated UTF-8 string.
    fn string(&mut self, what: &str) -> Result<&'a str> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| truncated(what))?;
        let s = std::str::from_utf8(&rest[..len])
            .map_err(|_| PassNoteError::InvalidFormat(format!("{what} is not valid UTF-8")))?;
        self.pos += len + 1;
        Ok(s)
    }

    fn timestamp(&mut self) -> Result<i64> {
        let hex = self.string("field timestamp")?;
        if hex.is_empty()
            || hex.len() > MAX_HEX_DIGITS
            || !hex.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(bad_timestamp(hex));
        }
        if hex.len() == 8 {
            return u32::from_str_radix(hex, 16)
                .map(|raw| i64::from(raw as i32))
                .map_err(|_| bad_timestamp(hex));
        }
        u64::from_str_radix(hex, 16)
            .map(|raw| raw as i64)
            .map_err(|_| bad_timestamp(hex))
    }

    /// Read one node record and everything below it.
    ///
    /// Returns the node and whether a sibling record follows.
    fn node(&mut self, depth: usize) -> Result<(Node, bool)> {
        if depth > MAX_DEPTH {
            return Err(PassNoteError::InvalidFormat(format!(
                "packed tree is nested deeper than {MAX_DEPTH} levels"
            )));
        }

        let (kind, has_next) = self.tag()?;
        let node = match kind {
            TAG_HOLDER => Node::Holder(self.holder(depth, false)?),
            TAG_EMPTY_HOLDER => Node::Holder(self.holder(depth, true)?),
            TAG_LEAF => Node::Leaf(self.leaf()?),
            other => {
                return Err(PassNoteError::InvalidFormat(format!(
                    "unknown record tag 0x{other:02x}"
                )))
            }
        };
        Ok((node, has_next))
    }

    fn holder(&mut self, depth: usize, empty: bool) -> Result<Holder> {
        let mut holder = Holder::new(self.string("holder name")?);

        let mut more = !empty;
        while more {
            let (child, has_next) = self.node(depth + 1)?;
            holder
                .append_child(child)
                .map_err(|e| duplicate("child", e))?;
            more = has_next;
        }
        Ok(holder)
    }

    fn leaf(&mut self) -> Result<Leaf> {
        let mut leaf = Leaf::new(self.string("leaf name")?);

        let mut more = self.peek() == Some(TAG_FIELD);
        while more {
            let (field, has_next) = self.field()?;
            leaf.append_field(field)
                .map_err(|e| duplicate("field", e))?;
            more = has_next;
        }
        Ok(leaf)
    }

    fn field(&mut self) -> Result<(Field, bool)> {
        let (kind, has_next) = self.tag()?;
        let modified = self.timestamp()?;
        if kind != TAG_FIELD {
            return Err(PassNoteError::InvalidFormat(format!(
                "expected field record, found tag 0x{kind:02x}"
            )));
        }
        let name = self.string("field name")?;
        let value = self.string("field value")?;
        Ok((Field::with_modified(name, value, modified), has_next))
    }
}

fn too_deep() -> PassNoteError {
    PassNoteError::InvalidOperation(format!(
        "tree is nested deeper than {MAX_DEPTH} levels"
    ))
}

fn truncated(what: &str) -> PassNoteError {
    PassNoteError::InvalidFormat(format!("packed tree truncated while reading {what}"))
}

fn bad_timestamp(hex: &str) -> PassNoteError {
    PassNoteError::InvalidFormat(format!("malformed field timestamp '{hex}'"))
}

fn duplicate(what: &str, err: PassNoteError) -> PassNoteError {
    PassNoteError::InvalidFormat(format!("duplicate {what} in packed tree: {err}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut root = Holder::new("Root");
        let mut bank = Holder::new("Bank");
        let mut savings = Leaf::new("Savings");
        savings
            .append_field(Field::with_modified("user", "alice", 0x10))
            .unwrap();
        savings
            .append_field(Field::with_modified("pass", "secret1", 0x2f))
            .unwrap();
        bank.append_child(savings.into()).unwrap();
        root.append_child(bank.into()).unwrap();
        root.append_child(Node::new_holder("Empty")).unwrap();
        root.append_child(Node::new_leaf("Bare")).unwrap();
        root.into()
    }

    #[test]
    fn pack_writes_exact_bytes() {
        let mut leaf = Leaf::new("L");
        leaf.append_field(Field::with_modified("a", "1", 255)).unwrap();
        let packed = pack(&leaf.into()).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"PASSNOTE");
        expected.extend_from_slice(b"l-L\0");
        expected.extend_from_slice(b"f-ff\0a\x001\0");
        expected.extend_from_slice(&[0u8; 8]);
        assert_eq!(&packed[..], &expected[..]);
    }

    #[test]
    fn pack_marks_siblings_and_empty_holders() {
        let packed = pack(&sample()).unwrap();
        let body = &packed[8..packed.len() - 8];
        // Root, then children in order: Bank (h+), Bare (l+), Empty (e-).
        assert!(body.starts_with(b"h-Root\0h+Bank\0l-Savings\0f+2f\0pass\0secret1\0"));
        assert!(body.ends_with(b"l+Bare\0e-Empty\0"));
    }

    #[test]
    fn roundtrip_preserves_tree() {
        let tree = sample();
        let packed = pack(&tree).unwrap();
        assert_eq!(unpack(&packed).unwrap(), tree);
    }

    #[test]
    fn leaf_root_roundtrip() {
        let tree = Node::new_leaf("only");
        assert_eq!(unpack(&pack(&tree).unwrap()).unwrap(), tree);
    }

    #[test]
    fn bad_magic_is_invalid_format() {
        let mut packed = pack(&sample()).unwrap();
        packed[0] = b'X';
        assert!(matches!(
            unpack(&packed),
            Err(PassNoteError::InvalidFormat(_))
        ));
        assert!(matches!(
            unpack(b"PASS"),
            Err(PassNoteError::InvalidFormat(_))
        ));
    }

    #[test]
    fn missing_footer_is_footer_mismatch() {
        let mut packed = pack(&sample()).unwrap();
        let last = packed.len() - 1;
        packed[last] = 1;
        assert!(matches!(
            unpack(&packed),
            Err(PassNoteError::FooterMismatch)
        ));
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let packed = pack(&sample()).unwrap();
        let mut cut = packed[..packed.len() - 20].to_vec();
        cut.extend_from_slice(FOOTER);
        assert!(unpack(&cut).is_err());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut data = b"PASSNOTEx-Root\0".to_vec();
        data.extend_from_slice(FOOTER);
        assert!(matches!(
            unpack(&data),
            Err(PassNoteError::InvalidFormat(_))
        ));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let mut data = b"PASSNOTEl-L\0f-zz\0a\0b\0".to_vec();
        data.extend_from_slice(FOOTER);
        assert!(unpack(&data).is_err());

        let mut data = b"PASSNOTEl-L\0f-\0a\0b\0".to_vec();
        data.extend_from_slice(FOOTER);
        assert!(unpack(&data).is_err());
    }

    #[test]
    fn duplicate_siblings_are_rejected() {
        let mut data = b"PASSNOTEh-R\0l+a\0l-A\0".to_vec();
        data.extend_from_slice(FOOTER);
        assert!(matches!(
            unpack(&data),
            Err(PassNoteError::InvalidFormat(_))
        ));
    }

    #[test]
    fn unsorted_stream_is_sorted_on_load() {
        let mut data = b"PASSNOTEh-R\0l+b\0l-a\0".to_vec();
        data.extend_from_slice(FOOTER);
        let tree = unpack(&data).unwrap();
        let holder = tree.as_holder().unwrap();
        assert_eq!(holder.get_nth_node(0).unwrap().name(), "a");
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut data = b"PASSNOTEl-L\0junk".to_vec();
        data.extend_from_slice(FOOTER);
        assert!(unpack(&data).is_err());
    }

    #[test]
    fn eight_digit_timestamps_are_sign_extended() {
        let mut data = b"PASSNOTEl-L\0f-ffffffff\0a\0b\0".to_vec();
        data.extend_from_slice(FOOTER);
        let tree = unpack(&data).unwrap();
        let field = tree.as_leaf().unwrap().get_nth_field(0).unwrap();
        assert_eq!(field.modified(), -1);
    }

    #[test]
    fn timestamps_past_2038_survive_roundtrip() {
        for modified in [0x7fff_ffff, 0x8000_0000, 0xffff_ffff, 0x1_0000_0000, -1] {
            let mut leaf = Leaf::new("L");
            leaf.append_field(Field::with_modified("a", "1", modified)).unwrap();
            let tree: Node = leaf.into();
            assert_eq!(unpack(&pack(&tree).unwrap()).unwrap(), tree);
        }
    }

    #[test]
    fn high_32_bit_timestamp_is_written_with_nine_digits() {
        let mut leaf = Leaf::new("L");
        leaf.append_field(Field::with_modified("a", "1", 0x8000_0000)).unwrap();
        let packed = pack(&leaf.into()).unwrap();
        assert!(packed.windows(12).any(|w| w == b"f-080000000\0"));
    }

    /// Leaf `end` below `levels` nested holders.
    fn chain(levels: usize) -> Node {
        let mut node = Node::new_leaf("end");
        for i in 0..levels {
            let mut holder = Holder::new(&format!("h{i}"));
            holder.append_child(node).unwrap();
            node = holder.into();
        }
        node
    }

    #[test]
    fn deepest_allowed_tree_roundtrips() {
        // MAX_DEPTH keeps the recursive reader inside a 2 MiB test thread
        // stack even in debug builds.
        let tree = chain(MAX_DEPTH);
        let packed = pack(&tree).unwrap();
        assert_eq!(unpack(&packed).unwrap(), tree);
    }

    #[test]
    fn too_deep_tree_cannot_be_packed() {
        let tree = chain(MAX_DEPTH + 1);
        assert!(matches!(
            pack(&tree),
            Err(PassNoteError::InvalidOperation(_))
        ));
    }

    #[test]
    fn nul_in_value_cannot_be_packed() {
        let mut leaf = Leaf::new("L");
        leaf.append_field(Field::new("a", "x\0y")).unwrap();
        assert!(pack(&leaf.into()).is_err());
    }
}
