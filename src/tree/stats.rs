use std::ops::AddAssign;

/// Change counters returned by merge and TSV paste.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub holders_added: usize,
    pub leaves_added: usize,
    pub fields_added: usize,
    pub fields_updated: usize,
}

impl Stats {
    /// `true` when nothing was added or updated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, other: Self) {
        self.holders_added += other.holders_added;
        self.leaves_added += other.leaves_added;
        self.fields_added += other.fields_added;
        self.fields_updated += other.fields_updated;
    }
}

/// Totals of a whole tree, root included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeCounts {
    pub holders: usize,
    pub leaves: usize,
    pub fields: usize,
}
