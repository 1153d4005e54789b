/// Kind of structural change a single edit made to the line sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    Insert,
    Remove,
}

/// Result of a structural edit, the sole input to anchor renumbering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub kind: DeltaKind,
    pub at: usize,
}

impl Delta {
    pub fn insert(at: usize) -> Self {
        Self {
            kind: DeltaKind::Insert,
            at,
        }
    }

    pub fn remove(at: usize) -> Self {
        Self {
            kind: DeltaKind::Remove,
            at,
        }
    }
}
