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

//! Half-open identifier range with a consumption cursor.

use std::cmp::Ordering;
use std::fmt;

use crate::errors::InvalidRange;
use crate::identifier::Identifier;

/// A half-open range `[lower, upper)` of identifiers, consumed from the lower end.
///
/// The bounds never change after construction. Only the cursor moves, from
/// `lower` towards `upper`; once it reaches `upper` the interval is exhausted
/// and its owner should discard it.
///
/// Ordering and equality look at the bounds only, never at the cursor.
/// Being an [`Iterator`] too, compare through `Ord::cmp`, not `.cmp()`,
/// which resolves to [`Iterator::cmp`].
#[derive(Clone)]
pub struct IdentifierInterval {
    lower: u64,
    upper: u64,
    cursor: u64,
}

impl IdentifierInterval {
    pub fn new(lower: u64, upper: u64) -> Result<Self, InvalidRange> {
        if upper < lower {
            return Err(InvalidRange { lower, upper });
        }
        Ok(Self::span(lower, upper))
    }

    /// Build an interval whose bounds the caller has already checked.
    pub(crate) fn span(lower: u64, upper: u64) -> Self {
        debug_assert!(lower <= upper, "span: {} > {}", lower, upper);
        Self {
            lower,
            upper,
            cursor: lower,
        }
    }

    pub fn lower_bound(&self) -> u64 {
        self.lower
    }

    pub fn upper_bound(&self) -> u64 {
        self.upper
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.upper
    }

    /// Number of identifiers not yet consumed.
    pub fn remaining(&self) -> u64 {
        self.upper - self.cursor
    }

    /// The smallest identifier not yet consumed, i.e. the effective lower end.
    pub(crate) fn cursor(&self) -> u64 {
        self.cursor
    }
}

impl Iterator for IdentifierInterval {
    type Item = Identifier;

    /// Return the cursor and advance it. An exhausted interval yields `None`.
    fn next(&mut self) -> Option<Identifier> {
        if !self.has_next() {
            return None;
        }
        let id = self.cursor;
        self.cursor += 1;
        Some(Identifier::new(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl PartialEq for IdentifierInterval {
    fn eq(&self, other: &Self) -> bool {
        (self.lower, self.upper) == (other.lower, other.upper)
    }
}

impl Eq for IdentifierInterval {}

impl PartialOrd for IdentifierInterval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl Ord for IdentifierInterval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower
            .cmp(&other.lower)
            .then(self.upper.cmp(&other.upper))
    }
}

impl fmt::Display for IdentifierInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentifierInterval{{{}, {}}}", self.lower, self.upper)
    }
}

impl fmt::Debug for IdentifierInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierInterval")
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn iv(lower: u64, upper: u64) -> IdentifierInterval {
        IdentifierInterval::new(lower, upper).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let res = IdentifierInterval::new(10, 5);
        assert_eq!(res.unwrap_err(), InvalidRange {
            lower: 10,
            upper: 5
        });
    }

    #[test]
    fn test_empty_interval() {
        let mut interval = iv(7, 7);
        assert!(!interval.has_next());
        assert_eq!(interval.remaining(), 0);
        assert_eq!(interval.next(), None);
    }

    #[test]
    fn test_next_yields_every_identifier_once() {
        let mut interval = iv(5, 10);

        let got = interval.by_ref().collect::<Vec<_>>();
        let want = (5..10).map(Identifier::new).collect::<Vec<_>>();
        assert_eq!(got, want);

        assert!(!interval.has_next());
        assert_eq!(interval.next(), None);
    }

    #[test]
    fn test_bounds_are_unaffected_by_consumption() {
        let mut interval = iv(5, 10);
        interval.next();
        interval.next();

        assert_eq!(interval.lower_bound(), 5);
        assert_eq!(interval.upper_bound(), 10);
        assert_eq!(interval.cursor(), 7);
        assert_eq!(interval.remaining(), 3);
    }

    #[test]
    fn test_ordering() {
        assert_eq!(Ord::cmp(&iv(5, 10), &iv(10, 15)), Ordering::Less);
        assert_eq!(Ord::cmp(&iv(5, 10), &iv(1, 5)), Ordering::Greater);
        assert_eq!(Ord::cmp(&iv(5, 10), &iv(5, 10)), Ordering::Equal);

        // Same lower bound: the upper bound breaks the tie.
        assert_eq!(Ord::cmp(&iv(5, 10), &iv(5, 12)), Ordering::Less);
    }

    #[test]
    fn test_equality_ignores_cursor() {
        let mut consumed = iv(5, 10);
        consumed.next();
        assert_eq!(consumed, iv(5, 10));
    }

    #[test]
    fn test_display() {
        let mut interval = iv(5, 10);
        interval.next();
        assert_eq!(interval.to_string(), "IdentifierInterval{5, 10}");
    }
}
