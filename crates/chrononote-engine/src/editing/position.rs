//! Translation between line-space and offset-space anchors.
//!
//! Offsets count chars into the joined text, one `'\n'` separator per line
//! boundary. These are pure functions of the current document, recomputed on
//! every call: any structural edit invalidates prior offsets, so nothing
//! here is ever cached.

use std::collections::BTreeMap;

use crate::editing::{Document, TimestampIndex};

/// Char offset of the first character of line `index`
///
/// `None` when the line does not exist.
pub fn line_to_offset(doc: &Document, index: usize) -> Option<usize> {
    if index >= doc.line_count() {
        return None;
    }
    let offset = doc.lines()[..index]
        .iter()
        .map(|line| line.chars().count() + 1)
        .sum();
    Some(offset)
}

/// The line whose char range contains `offset`
///
/// A boundary offset (the separator position at a line's trailing end)
/// belongs to the following line, matching "first character of the new
/// line" semantics; the start of a line always wins, so the round-trip law
/// `offset_to_line(line_to_offset(i)) == i` holds for empty lines too.
/// `offset == char_len()` resolves to the last line; anything beyond is
/// `None`.
pub fn offset_to_line(doc: &Document, offset: usize) -> Option<usize> {
    let count = doc.line_count();
    let mut start = 0;
    for (index, line) in doc.lines().iter().enumerate() {
        let len = line.chars().count();
        if offset == start || offset < start + len {
            return Some(index);
        }
        if offset == start + len {
            // Trailing boundary: the following line when one exists
            return if index + 1 < count {
                Some(index + 1)
            } else {
                Some(index)
            };
        }
        start += len + 1;
    }
    None
}

/// Project the line-space index into offset-space for hosts that only
/// understand character offsets
pub fn timestamps_by_offset(doc: &Document, index: &TimestampIndex) -> BTreeMap<usize, u64> {
    index
        .iter()
        .filter_map(|(line, ms)| line_to_offset(doc, line).map(|offset| (offset, ms)))
        .collect()
}

/// Rebuild a line-space index from an offset-space representation
///
/// Offsets beyond the document are silently dropped; a stale entry is
/// "not found", never a hard failure. When two offsets land on the same
/// line, the first (smallest offset) wins.
pub fn timestamps_from_offsets<I>(doc: &Document, offsets: I) -> TimestampIndex
where
    I: IntoIterator<Item = (usize, u64)>,
{
    let mut index = TimestampIndex::new();
    for (offset, ms) in offsets {
        if let Some(line) = offset_to_line(doc, offset) {
            index.create(line, ms);
        }
    }
    index
}
