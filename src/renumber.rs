//! Task renumbering: original task numbers onto canonical slots.
//!
//! The canonical scheme drops originals 1, 2, 5 and 26 and closes the
//! gaps, leaving canonical tasks 1 through 19. The mapping is an
//! enumerated table rather than an arithmetic rule: the 3→1, 4→2 and 6→3
//! entries already break strict linearity at the low boundary, and a
//! formula would reintroduce that discontinuity incorrectly.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::naming::TaskLabel;

/// Highest canonical task number; canonical slots run `1..=CANONICAL_TASK_COUNT`.
pub const CANONICAL_TASK_COUNT: u32 = 19;

/// The hand-curated table for this study, sorted by original number.
/// `None` marks a dropped task.
const STANDARD_TABLE: &[(u32, Option<u32>)] = &[
    (1, None),
    (2, None),
    (3, Some(1)),
    (4, Some(2)),
    (5, None),
    (6, Some(3)),
    (7, Some(4)),
    (8, Some(5)),
    (9, Some(6)),
    (10, Some(7)),
    (11, Some(8)),
    (12, Some(9)),
    (13, Some(10)),
    (14, Some(11)),
    (15, Some(12)),
    (16, Some(13)),
    (17, Some(14)),
    (18, Some(15)),
    (19, Some(16)),
    (20, Some(17)),
    (21, Some(18)),
    (22, Some(19)),
    (26, None),
];

/// Immutable mapping from original task numbers to canonical ones.
///
/// Constructed once and injected wherever renumbering is needed; never
/// process-wide state, so concurrent test fixtures cannot observe
/// cross-contamination.
#[derive(Debug, Clone)]
pub struct RenumberTable {
    map: BTreeMap<u32, Option<u32>>,
}

impl RenumberTable {
    /// The table used by this study.
    pub fn standard() -> Self {
        Self {
            map: STANDARD_TABLE.iter().copied().collect(),
        }
    }

    /// Canonical slot for an original task number, or `None` when the
    /// task is dropped. Numbers absent from the table behave exactly
    /// like dropped ones: silently excluded, not an error.
    pub fn lookup(&self, original: u32) -> Option<u32> {
        self.map.get(&original).copied().flatten()
    }

    pub fn lookup_label(&self, original: u32) -> Option<TaskLabel> {
        self.lookup(original).map(TaskLabel::new)
    }

    /// The fixed canonical task range, in order.
    pub fn canonical_numbers(&self) -> RangeInclusive<u32> {
        1..=CANONICAL_TASK_COUNT
    }

    /// Derived canonical→original table. Diagnostics only; forward
    /// resolution always goes through [`lookup`](Self::lookup).
    pub fn reverse(&self) -> BTreeMap<u32, u32> {
        self.map
            .iter()
            .filter_map(|(&original, &canonical)| canonical.map(|c| (c, original)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_entries() {
        let table = RenumberTable::standard();
        assert_eq!(table.lookup(3), Some(1));
        assert_eq!(table.lookup(4), Some(2));
        assert_eq!(table.lookup(6), Some(3));
        assert_eq!(table.lookup(7), Some(4));
        assert_eq!(table.lookup(22), Some(19));
    }

    #[test]
    fn test_dropped_originals() {
        let table = RenumberTable::standard();
        for original in [1, 2, 5, 26] {
            assert_eq!(table.lookup(original), None, "original {original}");
        }
    }

    #[test]
    fn test_unknown_originals_behave_like_dropped() {
        let table = RenumberTable::standard();
        assert_eq!(table.lookup(23), None);
        assert_eq!(table.lookup(0), None);
        assert_eq!(table.lookup(9999), None);
    }

    #[test]
    fn test_non_dropped_entries_are_injective() {
        let table = RenumberTable::standard();
        let canonical: Vec<u32> = (1..=26).filter_map(|n| table.lookup(n)).collect();
        let distinct: std::collections::BTreeSet<u32> = canonical.iter().copied().collect();
        assert_eq!(canonical.len(), distinct.len());
    }

    #[test]
    fn test_canonical_range_is_fully_covered() {
        let table = RenumberTable::standard();
        let covered: std::collections::BTreeSet<u32> = (1..=26).filter_map(|n| table.lookup(n)).collect();
        assert_eq!(covered, table.canonical_numbers().collect());
    }

    #[test]
    fn test_reverse_round_trips() {
        let table = RenumberTable::standard();
        for (canonical, original) in table.reverse() {
            assert_eq!(table.lookup(original), Some(canonical));
        }
    }

    #[test]
    fn test_lookup_label() {
        let table = RenumberTable::standard();
        assert_eq!(table.lookup_label(7).unwrap().name(), "Task4");
        assert!(table.lookup_label(5).is_none());
    }
}
