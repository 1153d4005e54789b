use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::editing::{Delta, DeltaKind};

/// Mapping from line-space anchor to elapsed recording time in milliseconds
///
/// Line-space is the canonical coordinate system; the offset-space view is
/// derived on demand through `position`. The index is renumbered from the
/// delta of every structural edit so it never references a stale line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampIndex {
    entries: BTreeMap<usize, u64>,
}

impl TimestampIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an anchor for a line, unless the line already has one
    ///
    /// Returns whether an anchor was created. Idempotent creation keeps the
    /// "at most one automatic anchor per line" guarantee even if the caller
    /// re-evaluates the same transition.
    pub fn create(&mut self, line: usize, time_ms: u64) -> bool {
        if self.entries.contains_key(&line) {
            return false;
        }
        self.entries.insert(line, time_ms);
        true
    }

    pub fn get(&self, line: usize) -> Option<u64> {
        self.entries.get(&line).copied()
    }

    pub fn contains(&self, line: usize) -> bool {
        self.entries.contains_key(&line)
    }

    /// Delete an entry explicitly (used when a line is merged away)
    pub fn remove(&mut self, line: usize) -> Option<u64> {
        self.entries.remove(&line)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Anchors in ascending line order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.entries.iter().map(|(&line, &ms)| (line, ms))
    }

    /// Renumber every stored anchor for one structural edit
    ///
    /// - Insert at k: anchors >= k shift up by one; the inserted line has no
    ///   anchor until the trigger adds one.
    /// - Remove at k: the anchor exactly at k is deleted; anchors > k shift
    ///   down by one.
    pub fn apply(&mut self, delta: &Delta) {
        match delta.kind {
            DeltaKind::Insert => {
                let shifted: Vec<(usize, u64)> = self
                    .entries
                    .split_off(&delta.at)
                    .into_iter()
                    .map(|(line, ms)| (line + 1, ms))
                    .collect();
                self.entries.extend(shifted);
            }
            DeltaKind::Remove => {
                self.entries.remove(&delta.at);
                let shifted: Vec<(usize, u64)> = self
                    .entries
                    .split_off(&delta.at)
                    .into_iter()
                    .map(|(line, ms)| (line - 1, ms))
                    .collect();
                self.entries.extend(shifted);
            }
        }
    }
}

impl FromIterator<(usize, u64)> for TimestampIndex {
    fn from_iter<I: IntoIterator<Item = (usize, u64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Find the stored anchor closest to `target`, if any lies strictly within
/// `max_distance`
///
/// Ties are broken by first found; callers must not rely on the order among
/// equal-distance anchors.
pub fn nearest_within<I>(anchors: I, target: usize, max_distance: usize) -> Option<(usize, u64)>
where
    I: IntoIterator<Item = (usize, u64)>,
{
    let mut best: Option<(usize, u64, usize)> = None;
    for (position, time_ms) in anchors {
        let distance = position.abs_diff(target);
        if distance >= max_distance {
            continue;
        }
        match best {
            Some((_, _, best_distance)) if best_distance <= distance => {}
            _ => best = Some((position, time_ms, distance)),
        }
    }
    best.map(|(position, time_ms, _)| (position, time_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn index(entries: &[(usize, u64)]) -> TimestampIndex {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_create_is_idempotent_per_line() {
        let mut idx = TimestampIndex::new();
        assert!(idx.create(3, 1000));
        assert!(!idx.create(3, 9999), "existing anchor must not be replaced");
        assert_eq!(idx.get(3), Some(1000));
    }

    #[test]
    fn test_insert_shifts_anchors_at_and_after() {
        let mut idx = index(&[(0, 10), (2, 20), (5, 30)]);
        idx.apply(&Delta::insert(2));

        assert_eq!(idx.get(0), Some(10), "anchor before insertion unchanged");
        assert_eq!(idx.get(2), None, "new line has no anchor");
        assert_eq!(idx.get(3), Some(20));
        assert_eq!(idx.get(6), Some(30));
    }

    #[test]
    fn test_remove_deletes_exact_and_shifts_later() {
        let mut idx = index(&[(0, 10), (2, 20), (5, 30)]);
        idx.apply(&Delta::remove(2));

        assert_eq!(idx.get(0), Some(10), "anchor before removal unchanged");
        assert_eq!(idx.get(2), None, "removed line's anchor is gone");
        assert_eq!(idx.get(4), Some(30));
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn test_remove_without_anchor_at_index_only_shifts() {
        let mut idx = index(&[(1, 10), (4, 40)]);
        idx.apply(&Delta::remove(2));

        assert_eq!(idx.get(1), Some(10));
        assert_eq!(idx.get(3), Some(40));
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn test_insert_then_remove_restores_original_set() {
        let original = index(&[(0, 10), (3, 30), (7, 70)]);
        let mut idx = original.clone();

        idx.apply(&Delta::insert(3));
        idx.apply(&Delta::remove(3));

        assert_eq!(idx, original);
    }

    #[test]
    fn test_insert_shifts_adjacent_runs_without_collisions() {
        // Consecutive anchors must all shift, not overwrite each other
        let mut idx = index(&[(1, 10), (2, 20), (3, 30)]);
        idx.apply(&Delta::insert(1));

        assert_eq!(
            idx.iter().collect::<Vec<_>>(),
            vec![(2, 10), (3, 20), (4, 30)]
        );
    }

    #[test]
    fn test_remove_shifts_adjacent_runs_without_collisions() {
        let mut idx = index(&[(1, 10), (2, 20), (3, 30)]);
        idx.apply(&Delta::remove(1));

        assert_eq!(idx.iter().collect::<Vec<_>>(), vec![(1, 20), (2, 30)]);
    }

    #[test]
    fn test_explicit_remove_returns_time() {
        let mut idx = index(&[(2, 2500)]);
        assert_eq!(idx.remove(2), Some(2500));
        assert_eq!(idx.remove(2), None);
        assert!(idx.is_empty());
    }

    #[rstest]
    #[case(&[(10, 100)], 10, 20, Some((10, 100)))] // exact hit
    #[case(&[(10, 100)], 29, 20, Some((10, 100)))] // distance 19, inside
    #[case(&[(10, 100)], 30, 20, None)] // distance 20, not strictly inside
    #[case(&[(10, 100)], 35, 20, None)] // distance 25, outside
    #[case(&[(10, 100), (40, 400)], 24, 20, Some((10, 100)))] // closer of two
    #[case(&[], 5, 20, None)] // nothing stored
    fn test_nearest_within(
        #[case] anchors: &[(usize, u64)],
        #[case] target: usize,
        #[case] max_distance: usize,
        #[case] expected: Option<(usize, u64)>,
    ) {
        let found = nearest_within(anchors.iter().copied(), target, max_distance);
        assert_eq!(found, expected);
    }

    #[test]
    fn test_nearest_within_tie_takes_first_found() {
        // Both at distance 5; order among equal distances is unspecified,
        // but some anchor must be returned
        let found = nearest_within([(5usize, 50u64), (15, 150)], 10, 20);
        assert!(found == Some((5, 50)) || found == Some((15, 150)));
    }

    #[test]
    fn test_serialization_round_trip() {
        let idx = index(&[(0, 0), (4, 12_000)]);
        let json = serde_json::to_string(&idx).unwrap();
        let back: TimestampIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(back, idx);
    }
}
