// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Subset Lattice
//!
//! Bitmask subsets of a criterion set `{0..n-1}` and the canonical
//! enumeration of all `2^n` of them. The enumeration order is part of the
//! public contract: subsets are listed by increasing cardinality, ties
//! broken lexicographically on their member lists, with the empty set
//! always at position 0 and the full set always last.
//!
//! Capacity generation and the capacity-integral linearization both address
//! Möbius masses and envelope variables by lattice position. They must never
//! disagree on which integer denotes which subset, so both consume the same
//! `SubsetLattice` and the inverse mapping `index_of` is an exact bijection
//! with the enumeration.
//!
//! Enumeration is O(2^n) in time and space. This is inherent to the
//! capacity-based aggregation model, not an implementation shortcut; the
//! practical ceiling is around twenty criteria and `MAX_CRITERIA` bounds the
//! representation at 30.

use crate::utils::index::{TypedIndex, TypedIndexTag};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Hard cap on the number of criteria a lattice can span.
///
/// Subsets are stored as `u32` bitmasks and the lattice materializes all
/// `2^n` subsets, so anything beyond this is both unrepresentable and
/// computationally out of reach.
pub const MAX_CRITERIA: usize = 30;

/// A tag type for canonical subset positions in a `SubsetLattice`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SubsetIndexTag;

impl TypedIndexTag for SubsetIndexTag {
    const NAME: &'static str = "SubsetIndex";
}

/// A typed index for canonical subset positions.
pub type SubsetIndex = TypedIndex<SubsetIndexTag>;

/// A subset of the criterion set `{0..n-1}`, stored as a bitmask.
///
/// Bit `i` set means criterion `i` is a member. The representation is
/// independent of any particular lattice; `SubsetLattice::index_of` maps a
/// subset to its canonical position.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subset {
    bits: u32,
}

impl Subset {
    /// The empty subset.
    pub const EMPTY: Subset = Subset { bits: 0 };

    /// Creates a subset containing exactly one criterion.
    ///
    /// # Panics
    ///
    /// Panics if `member >= MAX_CRITERIA`.
    #[inline]
    pub fn singleton(member: usize) -> Self {
        assert!(
            member < MAX_CRITERIA,
            "called `Subset::singleton` with member {} but at most {} criteria are supported",
            member,
            MAX_CRITERIA
        );
        Subset {
            bits: 1u32 << member,
        }
    }

    /// Creates a subset from an iterator of member indices.
    ///
    /// # Panics
    ///
    /// Panics if any member is `>= MAX_CRITERIA`.
    pub fn from_members<I>(members: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut bits = 0u32;
        for member in members {
            assert!(
                member < MAX_CRITERIA,
                "called `Subset::from_members` with member {} but at most {} criteria are supported",
                member,
                MAX_CRITERIA
            );
            bits |= 1u32 << member;
        }
        Subset { bits }
    }

    /// Returns the raw bitmask.
    #[inline(always)]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns `true` if the subset has no members.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns the number of members.
    #[inline(always)]
    pub const fn cardinality(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if `member` is in the subset.
    #[inline(always)]
    pub const fn contains(&self, member: usize) -> bool {
        member < 32 && self.bits & (1u32 << member) != 0
    }

    /// Returns a copy of this subset with `member` added.
    ///
    /// # Panics
    ///
    /// Panics if `member >= MAX_CRITERIA`.
    #[inline]
    pub fn with(&self, member: usize) -> Self {
        assert!(
            member < MAX_CRITERIA,
            "called `Subset::with` with member {} but at most {} criteria are supported",
            member,
            MAX_CRITERIA
        );
        Subset {
            bits: self.bits | (1u32 << member),
        }
    }

    /// Returns `true` if every member of `self` is also a member of `other`.
    #[inline(always)]
    pub const fn is_subset_of(&self, other: Subset) -> bool {
        self.bits & other.bits == self.bits
    }

    /// Returns an iterator over the members in ascending order.
    #[inline]
    pub fn members(&self) -> Members {
        Members { bits: self.bits }
    }
}

impl std::fmt::Display for Subset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let members: SmallVec<[usize; 8]> = self.members().collect();
        write!(f, "{{")?;
        for (pos, member) in members.iter().enumerate() {
            if pos > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", member)?;
        }
        write!(f, "}}")
    }
}

impl std::fmt::Debug for Subset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subset({})", self)
    }
}

/// Iterator over the members of a `Subset` in ascending order.
#[derive(Clone, Debug)]
pub struct Members {
    bits: u32,
}

impl Iterator for Members {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        let member = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(member)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Members {}
impl std::iter::FusedIterator for Members {}

/// The canonical enumeration of all subsets of `{0..n-1}`.
///
/// Subsets are listed by increasing cardinality, ties broken
/// lexicographically on member lists; position 0 is always the empty set
/// and the last position is always the full set. `index_of` is the exact
/// inverse of that enumeration.
///
/// # Examples
///
/// ```rust
/// use choqlin_core::lattice::{Subset, SubsetLattice};
///
/// let lattice = SubsetLattice::new(3);
/// assert_eq!(lattice.len(), 8);
/// assert_eq!(lattice.subsets()[0], Subset::EMPTY);
///
/// let pair = Subset::from_members([0, 2]);
/// let ix = lattice.index_of(pair);
/// assert_eq!(lattice.subset(ix), pair);
/// ```
#[derive(Clone, Debug)]
pub struct SubsetLattice {
    num_criteria: usize,
    subsets: Vec<Subset>,
    index_by_bits: FxHashMap<u32, SubsetIndex>,
}

impl SubsetLattice {
    /// Builds the lattice over `num_criteria` criteria.
    ///
    /// # Panics
    ///
    /// Panics if `num_criteria > MAX_CRITERIA`.
    pub fn new(num_criteria: usize) -> Self {
        assert!(
            num_criteria <= MAX_CRITERIA,
            "called `SubsetLattice::new` with {} criteria but at most {} are supported",
            num_criteria,
            MAX_CRITERIA
        );

        let len = 1usize << num_criteria;
        let mut subsets = Vec::with_capacity(len);
        subsets.push(Subset::EMPTY);

        for size in 1..=num_criteria {
            let mut combination: SmallVec<[usize; 8]> = (0..size).collect();
            loop {
                subsets.push(Subset::from_members(combination.iter().copied()));
                if !next_combination(&mut combination, num_criteria) {
                    break;
                }
            }
        }
        debug_assert_eq!(subsets.len(), len);

        let mut index_by_bits =
            FxHashMap::with_capacity_and_hasher(len, Default::default());
        for (position, subset) in subsets.iter().enumerate() {
            index_by_bits.insert(subset.bits(), SubsetIndex::new(position));
        }

        Self {
            num_criteria,
            subsets,
            index_by_bits,
        }
    }

    /// Returns the number of criteria the lattice spans.
    #[inline]
    pub fn num_criteria(&self) -> usize {
        self.num_criteria
    }

    /// Returns the number of subsets, `2^num_criteria`.
    #[inline]
    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    /// Returns `true` if the lattice contains only the empty set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        // A lattice always contains at least the empty set.
        false
    }

    /// Returns the subsets in canonical order.
    #[inline]
    pub fn subsets(&self) -> &[Subset] {
        &self.subsets
    }

    /// Returns the subset containing every criterion.
    #[inline]
    pub fn full_set(&self) -> Subset {
        self.subsets[self.subsets.len() - 1]
    }

    /// Returns the subset at the given canonical position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn subset(&self, index: SubsetIndex) -> Subset {
        debug_assert!(
            index.get() < self.len(),
            "called `SubsetLattice::subset` with index out of bounds: the len is {} but the index is {}",
            self.len(),
            index.get()
        );
        self.subsets[index.get()]
    }

    /// Returns the canonical position of the given subset.
    ///
    /// # Panics
    ///
    /// Panics if the subset mentions criteria outside this lattice. That is
    /// a wiring defect between components, not a runtime condition.
    #[inline]
    pub fn index_of(&self, subset: Subset) -> SubsetIndex {
        match self.index_by_bits.get(&subset.bits()) {
            Some(&index) => index,
            None => panic!(
                "called `SubsetLattice::index_of` with subset {} outside a lattice over {} criteria",
                subset, self.num_criteria
            ),
        }
    }
}

/// Advances `combination` to the next k-combination of `{0..n-1}` in
/// lexicographic order. Returns `false` once the last combination has been
/// reached.
fn next_combination(combination: &mut [usize], n: usize) -> bool {
    let k = combination.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if combination[i] < n - k + i {
            combination[i] += 1;
            for j in i + 1..k {
                combination[j] = combination[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subset_basics() {
        let s = Subset::from_members([0, 2, 3]);
        assert_eq!(s.cardinality(), 3);
        assert!(s.contains(0));
        assert!(!s.contains(1));
        assert!(s.contains(2));
        assert!(s.contains(3));
        assert!(!s.is_empty());
        assert!(Subset::EMPTY.is_empty());
        assert_eq!(format!("{}", s), "{0, 2, 3}");
    }

    #[test]
    fn test_members_iterates_in_ascending_order() {
        let s = Subset::from_members([4, 1, 6]);
        let members: Vec<usize> = s.members().collect();
        assert_eq!(members, vec![1, 4, 6]);
        assert_eq!(s.members().len(), 3);
    }

    #[test]
    fn test_subset_of_relation() {
        let small = Subset::from_members([1, 3]);
        let big = Subset::from_members([0, 1, 3]);
        assert!(small.is_subset_of(big));
        assert!(!big.is_subset_of(small));
        assert!(Subset::EMPTY.is_subset_of(small));
        assert!(small.is_subset_of(small));
    }

    #[test]
    fn test_lattice_order_for_three_criteria() {
        let lattice = SubsetLattice::new(3);
        let expected: Vec<Subset> = [
            vec![],
            vec![0],
            vec![1],
            vec![2],
            vec![0, 1],
            vec![0, 2],
            vec![1, 2],
            vec![0, 1, 2],
        ]
        .into_iter()
        .map(Subset::from_members)
        .collect();

        assert_eq!(lattice.subsets(), &expected[..]);
        assert_eq!(lattice.full_set(), Subset::from_members([0, 1, 2]));
    }

    #[test]
    fn test_lattice_counts_and_bijection() {
        for n in 0..=10 {
            let lattice = SubsetLattice::new(n);
            assert_eq!(lattice.len(), 1usize << n);
            assert_eq!(lattice.subsets()[0], Subset::EMPTY);

            // Sizes are non-decreasing along the enumeration.
            for pair in lattice.subsets().windows(2) {
                assert!(pair[0].cardinality() <= pair[1].cardinality());
            }

            // All subsets distinct, and index_of inverts the enumeration.
            for (position, &subset) in lattice.subsets().iter().enumerate() {
                let ix = lattice.index_of(subset);
                assert_eq!(ix.get(), position);
                assert_eq!(lattice.subset(ix), subset);
            }
        }
    }

    #[test]
    fn test_lattice_is_deterministic() {
        let a = SubsetLattice::new(5);
        let b = SubsetLattice::new(5);
        assert_eq!(a.subsets(), b.subsets());
    }

    #[test]
    #[should_panic(expected = "outside a lattice over 2 criteria")]
    fn test_index_of_foreign_subset_panics() {
        let lattice = SubsetLattice::new(2);
        let _ = lattice.index_of(Subset::singleton(5));
    }

    #[test]
    #[should_panic(expected = "at most 30 are supported")]
    fn test_lattice_rejects_too_many_criteria() {
        let _ = SubsetLattice::new(31);
    }
}
