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

//! The immutable problem instance consumed by every linearizer.
//!
//! A `ProblemInstance` holds the utility matrix (criteria × items), the
//! optional per-item costs, and the two counts. It is validated once at
//! construction and never mutated afterwards; the linearizers treat it as a
//! read-only source of coefficients.

use crate::index::{CriterionIndex, ItemIndex};
use num_traits::{PrimInt, Signed};
use rand::Rng;

#[inline(always)]
fn flatten_index(num_items: usize, criterion: CriterionIndex, item: ItemIndex) -> usize {
    criterion.get() * num_items + item.get()
}

/// The error type for problem instance validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// The instance declares zero criteria.
    EmptyCriteria,
    /// The instance declares zero items.
    EmptyItems,
    /// A utility row does not match the declared item count.
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A utility value is negative.
    NegativeUtility { criterion: usize, item: usize },
    /// The cost vector does not match the declared item count.
    CostCountMismatch { expected: usize, actual: usize },
    /// A cost value is negative.
    NegativeCost { item: usize },
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCriteria => write!(f, "Instance must declare at least one criterion"),
            Self::EmptyItems => write!(f, "Instance must declare at least one item"),
            Self::RowLengthMismatch {
                row,
                expected,
                actual,
            } => write!(
                f,
                "Utility row {} has {} entries but the instance declares {} items",
                row, actual, expected
            ),
            Self::NegativeUtility { criterion, item } => write!(
                f,
                "Utility of item {} under criterion {} is negative",
                item, criterion
            ),
            Self::CostCountMismatch { expected, actual } => write!(
                f,
                "Cost vector has {} entries but the instance declares {} items",
                actual, expected
            ),
            Self::NegativeCost { item } => {
                write!(f, "Cost of item {} is negative", item)
            }
        }
    }
}

impl std::error::Error for InstanceError {}

/// An immutable multi-criteria problem instance.
///
/// Utilities are stored row-major: `utilities[criterion * num_items + item]`
/// is the utility of the item with respect to the criterion. Costs are
/// present only for budget-constrained selection problems.
///
/// Construction goes through `ProblemInstanceBuilder` or
/// `ProblemInstance::from_rows`; both validate eagerly and reject malformed
/// input with an `InstanceError` before any model building happens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemInstance<T> {
    num_criteria: usize,
    num_items: usize,
    utilities: Vec<T>,
    costs: Option<Vec<T>>,
}

impl<T> ProblemInstance<T>
where
    T: PrimInt + Signed,
{
    /// Builds an instance from utility rows and an optional cost vector.
    ///
    /// The number of rows determines the criterion count; every row must
    /// have the same length, which determines the item count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use choqlin_model::instance::ProblemInstance;
    ///
    /// let instance =
    ///     ProblemInstance::from_rows(vec![vec![10i64, 5, 1], vec![1, 5, 10]], None).unwrap();
    /// assert_eq!(instance.num_criteria(), 2);
    /// assert_eq!(instance.num_items(), 3);
    /// ```
    pub fn from_rows(rows: Vec<Vec<T>>, costs: Option<Vec<T>>) -> Result<Self, InstanceError> {
        if rows.is_empty() {
            return Err(InstanceError::EmptyCriteria);
        }
        let num_items = rows[0].len();

        let mut builder = ProblemInstanceBuilder::new(rows.len(), num_items);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != num_items {
                return Err(InstanceError::RowLengthMismatch {
                    row: i,
                    expected: num_items,
                    actual: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                builder.set_utility(CriterionIndex::new(i), ItemIndex::new(j), value);
            }
        }
        if let Some(costs) = costs {
            builder.set_costs(costs);
        }
        builder.build()
    }

    /// Returns the number of criteria (objectives or agents).
    #[inline]
    pub fn num_criteria(&self) -> usize {
        self.num_criteria
    }

    /// Returns the number of items (items or projects).
    #[inline]
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Returns the utility of `item` with respect to `criterion`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either index is out of bounds.
    #[inline]
    pub fn utility(&self, criterion: CriterionIndex, item: ItemIndex) -> T {
        debug_assert!(
            criterion.get() < self.num_criteria,
            "called `ProblemInstance::utility` with criterion index out of bounds: the len is {} but the index is {}",
            self.num_criteria,
            criterion.get()
        );
        debug_assert!(
            item.get() < self.num_items,
            "called `ProblemInstance::utility` with item index out of bounds: the len is {} but the index is {}",
            self.num_items,
            item.get()
        );

        self.utilities[flatten_index(self.num_items, criterion, item)]
    }

    /// Returns the utility row of a criterion as a slice.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `criterion` is out of bounds.
    #[inline]
    pub fn utility_row(&self, criterion: CriterionIndex) -> &[T] {
        debug_assert!(
            criterion.get() < self.num_criteria,
            "called `ProblemInstance::utility_row` with criterion index out of bounds: the len is {} but the index is {}",
            self.num_criteria,
            criterion.get()
        );

        let start = criterion.get() * self.num_items;
        &self.utilities[start..start + self.num_items]
    }

    /// Returns the flat row-major utility matrix.
    #[inline]
    pub fn utilities(&self) -> &[T] {
        &self.utilities
    }

    /// Returns the per-item costs, if the instance carries any.
    #[inline]
    pub fn costs(&self) -> Option<&[T]> {
        self.costs.as_deref()
    }

    /// Returns `true` if the instance carries a cost vector.
    #[inline]
    pub fn has_costs(&self) -> bool {
        self.costs.is_some()
    }

    /// Returns the sum of one criterion's utility row as `f64`.
    pub fn utility_row_sum(&self, criterion: CriterionIndex) -> f64 {
        self.utility_row(criterion)
            .iter()
            .map(|value| {
                value
                    .to_f64()
                    .expect("primitive integer utilities are representable as f64")
            })
            .sum()
    }

    /// Returns the sum of every utility in the matrix as `f64`.
    ///
    /// This is an analytic upper bound on any attainable satisfaction, which
    /// is what the ordered-weighting linearization sizes its deactivation
    /// constant from.
    pub fn total_utility(&self) -> f64 {
        self.utilities
            .iter()
            .map(|value| {
                value
                    .to_f64()
                    .expect("primitive integer utilities are representable as f64")
            })
            .sum()
    }

    /// Returns half the total cost, the budget convention the selection
    /// problems in the literature default to.
    ///
    /// Returns `None` when the instance carries no costs. The budget passed
    /// to a linearizer is always explicit; this is a convenience, not an
    /// implicit default.
    pub fn half_cost_budget(&self) -> Option<f64> {
        self.costs.as_ref().map(|costs| {
            costs
                .iter()
                .map(|cost| {
                    cost.to_f64()
                        .expect("primitive integer costs are representable as f64")
                })
                .sum::<f64>()
                / 2.0
        })
    }
}

impl ProblemInstance<i64> {
    /// Generates a random item-assignment instance.
    ///
    /// Utilities are drawn uniformly from `0..50`, the conventional range
    /// for fair-division benchmarks. No costs are attached.
    ///
    /// # Panics
    ///
    /// Panics if `num_agents` or `num_items` is zero.
    pub fn random_assignment<R: Rng + ?Sized>(
        num_agents: usize,
        num_items: usize,
        rng: &mut R,
    ) -> Self {
        assert!(
            num_agents > 0 && num_items > 0,
            "called `ProblemInstance::random_assignment` with empty dimensions: {} agents, {} items",
            num_agents,
            num_items
        );

        let mut builder = ProblemInstanceBuilder::new(num_agents, num_items);
        for i in 0..num_agents {
            for j in 0..num_items {
                builder.set_utility(
                    CriterionIndex::new(i),
                    ItemIndex::new(j),
                    rng.gen_range(0..50),
                );
            }
        }
        builder
            .build()
            .expect("randomly generated assignment instance is valid")
    }

    /// Generates a random budgeted project-selection instance.
    ///
    /// Utilities are drawn uniformly from `1..=20` and costs from
    /// `10..=100`.
    ///
    /// # Panics
    ///
    /// Panics if `num_objectives` or `num_projects` is zero.
    pub fn random_selection<R: Rng + ?Sized>(
        num_objectives: usize,
        num_projects: usize,
        rng: &mut R,
    ) -> Self {
        assert!(
            num_objectives > 0 && num_projects > 0,
            "called `ProblemInstance::random_selection` with empty dimensions: {} objectives, {} projects",
            num_objectives,
            num_projects
        );

        let mut builder = ProblemInstanceBuilder::new(num_objectives, num_projects);
        for i in 0..num_objectives {
            for j in 0..num_projects {
                builder.set_utility(
                    CriterionIndex::new(i),
                    ItemIndex::new(j),
                    rng.gen_range(1..=20),
                );
            }
        }
        builder.set_costs((0..num_projects).map(|_| rng.gen_range(10..=100)).collect());
        builder
            .build()
            .expect("randomly generated selection instance is valid")
    }
}

/// A mutable builder for `ProblemInstance`.
///
/// Utilities default to zero. `build` validates the assembled instance and
/// is the only way to obtain a `ProblemInstance` from a builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemInstanceBuilder<T> {
    num_criteria: usize,
    num_items: usize,
    utilities: Vec<T>,
    costs: Option<Vec<T>>,
}

impl<T> ProblemInstanceBuilder<T>
where
    T: PrimInt + Signed,
{
    /// Creates a builder for an instance with the given dimensions, all
    /// utilities zero and no costs.
    pub fn new(num_criteria: usize, num_items: usize) -> Self {
        Self {
            num_criteria,
            num_items,
            utilities: vec![T::zero(); num_criteria * num_items],
            costs: None,
        }
    }

    /// Sets the utility of `item` with respect to `criterion`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn set_utility(&mut self, criterion: CriterionIndex, item: ItemIndex, value: T) {
        assert!(
            criterion.get() < self.num_criteria,
            "called `ProblemInstanceBuilder::set_utility` with criterion index out of bounds: the len is {} but the index is {}",
            self.num_criteria,
            criterion.get()
        );
        assert!(
            item.get() < self.num_items,
            "called `ProblemInstanceBuilder::set_utility` with item index out of bounds: the len is {} but the index is {}",
            self.num_items,
            item.get()
        );

        self.utilities[flatten_index(self.num_items, criterion, item)] = value;
    }

    /// Attaches a cost vector. Length is validated at `build`.
    pub fn set_costs(&mut self, costs: Vec<T>) {
        self.costs = Some(costs);
    }

    /// Validates the assembled data and builds the immutable instance.
    pub fn build(self) -> Result<ProblemInstance<T>, InstanceError> {
        if self.num_criteria == 0 {
            return Err(InstanceError::EmptyCriteria);
        }
        if self.num_items == 0 {
            return Err(InstanceError::EmptyItems);
        }

        for (flat, &value) in self.utilities.iter().enumerate() {
            if value < T::zero() {
                return Err(InstanceError::NegativeUtility {
                    criterion: flat / self.num_items,
                    item: flat % self.num_items,
                });
            }
        }

        if let Some(costs) = &self.costs {
            if costs.len() != self.num_items {
                return Err(InstanceError::CostCountMismatch {
                    expected: self.num_items,
                    actual: costs.len(),
                });
            }
            for (item, &cost) in costs.iter().enumerate() {
                if cost < T::zero() {
                    return Err(InstanceError::NegativeCost { item });
                }
            }
        }

        Ok(ProblemInstance {
            num_criteria: self.num_criteria,
            num_items: self.num_items,
            utilities: self.utilities,
            costs: self.costs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ci(i: usize) -> CriterionIndex {
        CriterionIndex::new(i)
    }

    fn ii(j: usize) -> ItemIndex {
        ItemIndex::new(j)
    }

    #[test]
    fn test_from_rows_and_accessors() {
        let instance = ProblemInstance::from_rows(
            vec![vec![10i64, 5, 1], vec![1, 5, 10]],
            Some(vec![10, 10, 10]),
        )
        .expect("valid instance");

        assert_eq!(instance.num_criteria(), 2);
        assert_eq!(instance.num_items(), 3);
        assert_eq!(instance.utility(ci(0), ii(1)), 5);
        assert_eq!(instance.utility(ci(1), ii(2)), 10);
        assert_eq!(instance.utility_row(ci(0)), &[10, 5, 1]);
        assert_eq!(instance.costs(), Some(&[10i64, 10, 10][..]));
        assert_eq!(instance.total_utility(), 32.0);
        assert_eq!(instance.utility_row_sum(ci(1)), 16.0);
        assert_eq!(instance.half_cost_budget(), Some(15.0));
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        assert_eq!(
            ProblemInstance::<i64>::from_rows(vec![], None),
            Err(InstanceError::EmptyCriteria)
        );
        assert_eq!(
            ProblemInstanceBuilder::<i64>::new(2, 0).build(),
            Err(InstanceError::EmptyItems)
        );
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = ProblemInstance::from_rows(vec![vec![1i64, 2], vec![3]], None);
        assert_eq!(
            result,
            Err(InstanceError::RowLengthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_rejects_negative_utility_and_cost() {
        let result = ProblemInstance::from_rows(vec![vec![1i64, -2], vec![3, 4]], None);
        assert_eq!(
            result,
            Err(InstanceError::NegativeUtility {
                criterion: 0,
                item: 1
            })
        );

        let result =
            ProblemInstance::from_rows(vec![vec![1i64, 2], vec![3, 4]], Some(vec![5, -1]));
        assert_eq!(result, Err(InstanceError::NegativeCost { item: 1 }));
    }

    #[test]
    fn test_rejects_cost_count_mismatch() {
        let result = ProblemInstance::from_rows(vec![vec![1i64, 2]], Some(vec![3]));
        assert_eq!(
            result,
            Err(InstanceError::CostCountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_random_assignment_respects_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let instance = ProblemInstance::random_assignment(4, 6, &mut rng);

        assert_eq!(instance.num_criteria(), 4);
        assert_eq!(instance.num_items(), 6);
        assert!(!instance.has_costs());
        assert!(instance.utilities().iter().all(|&u| (0..50).contains(&u)));
    }

    #[test]
    fn test_random_selection_respects_ranges_and_is_seeded() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let first = ProblemInstance::random_selection(3, 5, &mut rng);

        assert!(first.utilities().iter().all(|&u| (1..=20).contains(&u)));
        let costs = first.costs().expect("selection instances carry costs");
        assert!(costs.iter().all(|&c| (10..=100).contains(&c)));

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let second = ProblemInstance::random_selection(3, 5, &mut rng);
        assert_eq!(first, second);
    }
}
