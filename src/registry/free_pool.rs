// Copyright 2021 Datafuse Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::ops::Bound;

use log::debug;

use crate::identifier::Identifier;
use crate::interval::IdentifierInterval;

/// Sorted set of released identifier ranges.
///
/// Intervals are keyed by their upper bound. For disjoint ranges this is the
/// same order as by lower bound, and unlike the effective lower end (the
/// cursor), the upper bound does not move while an interval is consumed.
///
/// No two intervals overlap or touch: adjacent runs are merged on insert.
/// An exhausted interval is never stored.
#[derive(Debug, Default)]
pub(crate) struct FreePool {
    intervals: BTreeMap<u64, IdentifierInterval>,

    /// Number of unconsumed identifiers across all intervals.
    len: u64,
}

impl FreePool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> u64 {
        self.len
    }

    pub(crate) fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Take the numerically smallest free identifier.
    pub(crate) fn pop_smallest(&mut self) -> Option<Identifier> {
        let mut entry = self.intervals.first_entry()?;

        let interval = entry.get_mut();
        let id = interval.next();
        let exhausted = !interval.has_next();

        if exhausted {
            entry.remove();
        }
        if id.is_some() {
            self.len -= 1;
        }
        id
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        // The only candidate is the first interval ending after `id`.
        self.intervals
            .range((Bound::Excluded(id), Bound::Unbounded))
            .next()
            .is_some_and(|(_, interval)| interval.cursor() <= id)
    }

    /// Add the run `[lower, upper)`, coalescing with the free intervals right
    /// below and right above it.
    ///
    /// The run must not overlap any free interval.
    pub(crate) fn insert_run(&mut self, lower: u64, upper: u64) {
        debug_assert!(lower < upper, "insert_run: empty run [{}, {})", lower, upper);

        let mut merged_lower = lower;
        let mut merged_upper = upper;

        if let Some(below) = self.intervals.remove(&lower) {
            debug!("FreePool::insert_run: [{}, {}) merges below {:?}", lower, upper, below);
            merged_lower = below.cursor();
        }

        let above = self
            .intervals
            .range((Bound::Excluded(upper), Bound::Unbounded))
            .next()
            .filter(|(_, interval)| interval.cursor() == upper)
            .map(|(key, _)| *key);

        if let Some(key) = above {
            debug!("FreePool::insert_run: [{}, {}) merges above [{}, {})", lower, upper, upper, key);
            self.intervals.remove(&key);
            merged_upper = key;
        }

        self.intervals.insert(
            merged_upper,
            IdentifierInterval::span(merged_lower, merged_upper),
        );
        self.len += upper - lower;
    }

    /// The unconsumed part of every interval, in ascending order.
    pub(crate) fn intervals(&self) -> Vec<IdentifierInterval> {
        self.intervals
            .values()
            .map(|interval| IdentifierInterval::span(interval.cursor(), interval.upper_bound()))
            .collect()
    }
}

/// Split sorted, deduplicated identifiers into maximal runs of consecutive
/// values, each returned as a half-open `(lower, upper)` pair.
pub(crate) fn contiguous_runs(sorted: &[u64]) -> Vec<(u64, u64)> {
    let mut runs: Vec<(u64, u64)> = Vec::new();

    for &id in sorted {
        match runs.last_mut() {
            Some((_, upper)) if *upper == id => *upper += 1,
            _ => runs.push((id, id + 1)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bounds(pool: &FreePool) -> Vec<(u64, u64)> {
        pool.intervals()
            .iter()
            .map(|x| (x.lower_bound(), x.upper_bound()))
            .collect()
    }

    #[test]
    fn test_contiguous_runs() {
        assert_eq!(contiguous_runs(&[]), Vec::<(u64, u64)>::new());
        assert_eq!(contiguous_runs(&[3]), vec![(3, 4)]);
        assert_eq!(contiguous_runs(&[1, 2, 3, 5, 7, 8]), vec![
            (1, 4),
            (5, 6),
            (7, 9)
        ]);
    }

    #[test]
    fn test_insert_disjoint_runs() {
        let mut pool = FreePool::new();
        pool.insert_run(10, 12);
        pool.insert_run(1, 3);
        pool.insert_run(5, 6);

        assert_eq!(bounds(&pool), vec![(1, 3), (5, 6), (10, 12)]);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.interval_count(), 3);
    }

    #[test]
    fn test_insert_merges_below() {
        let mut pool = FreePool::new();
        pool.insert_run(1, 3);
        pool.insert_run(3, 5);

        assert_eq!(bounds(&pool), vec![(1, 5)]);
    }

    #[test]
    fn test_insert_merges_above() {
        let mut pool = FreePool::new();
        pool.insert_run(5, 8);
        pool.insert_run(2, 5);

        assert_eq!(bounds(&pool), vec![(2, 8)]);
    }

    #[test]
    fn test_insert_merges_both_sides() {
        let mut pool = FreePool::new();
        pool.insert_run(1, 3);
        pool.insert_run(6, 9);
        pool.insert_run(3, 6);

        assert_eq!(bounds(&pool), vec![(1, 9)]);
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn test_insert_merges_above_partially_consumed_interval() {
        let mut pool = FreePool::new();
        pool.insert_run(1, 6);

        // 1 and 2 are handed out again; the interval now starts at 3.
        assert_eq!(pool.pop_smallest(), Some(Identifier::new(1)));
        assert_eq!(pool.pop_smallest(), Some(Identifier::new(2)));

        pool.insert_run(2, 3);
        assert_eq!(bounds(&pool), vec![(2, 6)]);

        pool.insert_run(1, 2);
        assert_eq!(bounds(&pool), vec![(1, 6)]);
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn test_pop_smallest_drops_exhausted_interval() {
        let mut pool = FreePool::new();
        pool.insert_run(4, 5);
        pool.insert_run(8, 10);

        assert_eq!(pool.pop_smallest(), Some(Identifier::new(4)));
        assert_eq!(pool.interval_count(), 1);
        assert_eq!(pool.pop_smallest(), Some(Identifier::new(8)));
        assert_eq!(pool.pop_smallest(), Some(Identifier::new(9)));
        assert_eq!(pool.pop_smallest(), None);

        assert_eq!(pool.interval_count(), 0);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn test_contains() {
        let mut pool = FreePool::new();
        pool.insert_run(3, 6);
        pool.pop_smallest();

        assert!(!pool.contains(2));
        assert!(!pool.contains(3), "3 is consumed");
        assert!(pool.contains(4));
        assert!(pool.contains(5));
        assert!(!pool.contains(6));
    }
}
