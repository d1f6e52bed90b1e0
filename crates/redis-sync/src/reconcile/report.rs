use std::fmt;

/// Per-item outcome counts of one push or pull pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    /// Items whose target already held the same value.
    pub ignored: usize,
    /// Items declined at a prompt or dropped after a tolerated error.
    pub skipped: usize,
    pub total: usize,
}

impl ApplyReport {
    pub fn pushed(&self) -> usize {
        self.added + self.updated
    }

    /// `ignored: X, pushed: Y, total: Z`
    pub fn push_summary(&self) -> String {
        format!(
            "ignored: {}, pushed: {}, total: {}",
            self.ignored,
            self.pushed(),
            self.total
        )
    }

    /// `update: X, delete: Y, add: Z`
    pub fn pull_summary(&self) -> String {
        format!(
            "update: {}, delete: {}, add: {}",
            self.updated, self.removed, self.added
        )
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added: {}, updated: {}, removed: {}, ignored: {}, skipped: {}, total: {}",
            self.added, self.updated, self.removed, self.ignored, self.skipped, self.total
        )
    }
}
