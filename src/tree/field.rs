//! A single name/value secret inside a leaf.

use chrono::Utc;
use zeroize::Zeroizing;

use super::name::sealed::Rename;
use super::name::{trim_name, Named};

/// A name/value pair with the Unix time (seconds) of its last edit.
///
/// Name and value are wiped from memory when the field is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: Zeroizing<String>,
    value: Zeroizing<String>,
    modified: i64,
}

impl Field {
    /// Create a field stamped with the current time.
    pub fn new(name: &str, value: &str) -> Self {
        Self::with_modified(name, value, now())
    }

    /// Create a field with an explicit timestamp (used when decoding).
    pub fn with_modified(name: &str, value: &str, modified: i64) -> Self {
        Self {
            name: Zeroizing::new(trim_name(name).to_string()),
            value: Zeroizing::new(trim_name(value).to_string()),
            modified,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn modified(&self) -> i64 {
        self.modified
    }

    /// Replace the value and refresh the timestamp.
    pub fn edit(&mut self, value: &str) {
        self.value = Zeroizing::new(trim_name(value).to_string());
        self.modified = now();
    }

    /// Take over another field's value and timestamp.
    pub(crate) fn adopt(&mut self, mut other: Field) {
        std::mem::swap(&mut self.value, &mut other.value);
        self.modified = other.modified;
    }
}

impl Named for Field {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Rename for Field {
    fn set_name(&mut self, name: &str) {
        self.name = Zeroizing::new(trim_name(name).to_string());
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

/// Expand a one-letter field shortcut into its usual name.
///
/// Anything that is not a known shortcut comes back unchanged.
pub fn expand_field_name(abbrev: &str) -> &str {
    match abbrev {
        "n" => "Name",
        "u" => "Username",
        "p" => "Password",
        "t" => "Token",
        "d" => "Domain",
        "h" => "Phone",
        "s" => "Secret",
        "c" => "Address",
        "e" => "Email",
        "r" => "Recovery",
        "b" => "Birthday",
        "q" => "Question",
        "a" => "Answer",
        "l" => "Location",
        "x" => "Proxy",
        "i" => "Session",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_and_stamps() {
        let before = Utc::now().timestamp();
        let field = Field::new("  user\t", " alice \n");
        assert_eq!(field.name(), "user");
        assert_eq!(field.value(), "alice");
        assert!(field.modified() >= before);
    }

    #[test]
    fn edit_refreshes_timestamp() {
        let mut field = Field::with_modified("pass", "old", 1);
        field.edit(" new ");
        assert_eq!(field.value(), "new");
        assert!(field.modified() > 1);
    }

    #[test]
    fn adopt_copies_value_and_time() {
        let mut target = Field::with_modified("pass", "old", 10);
        target.adopt(Field::with_modified("PASS", "new", 20));
        assert_eq!(target.name(), "pass");
        assert_eq!(target.value(), "new");
        assert_eq!(target.modified(), 20);
    }

    #[test]
    fn shortcuts_expand() {
        assert_eq!(expand_field_name("u"), "Username");
        assert_eq!(expand_field_name("i"), "Session");
        assert_eq!(expand_field_name("Pin"), "Pin");
        assert_eq!(expand_field_name("U"), "U");
    }
}
