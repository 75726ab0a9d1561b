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

//! Linearization of capacity-based aggregation: WOWA and the Choquet
//! integral.
//!
//! Via its Möbius transform, the Choquet integral of a satisfaction
//! profile `z` is the mass-weighted sum of subset minima:
//! `sum_A m(A) * min_{i in A} z_i`. Minima are not linear, but under
//! maximization with non-negative masses they have an exact envelope
//! encoding: one continuous variable `y_A` per subset, bounded above by
//! every member's satisfaction (`y_A <= z_i` for `i in A`). The solver
//! pushes each `y_A` up to the binding bound, which is exactly the subset
//! minimum, so the linear objective `sum_A m(A) * y_A` equals the integral
//! at optimality. A negative mass would invert that argument — the solver
//! would pull `y_A` below the true minimum — which is why
//! `MobiusMassFunction` rejects signed masses at construction.
//!
//! One engine serves both aggregation flavors; they differ only in which
//! vector is being aggregated:
//!
//! * **WOWA** aggregates per-agent satisfactions under item-assignment
//!   constraints (`build_assignment_model`).
//! * **Choquet over projects** aggregates per-objective satisfactions
//!   under a budgeted selection (`build_selection_model`).
//!
//! The subset enumeration is O(2^n) in the criterion count; that
//! exponential blow-up is inherent to capacity-based aggregation and is
//! the documented scalability ceiling of this encoding.

use crate::{error::LinearizeError, submodel};
use choqlin_core::lattice::{SubsetIndex, SubsetLattice};
use choqlin_model::{
    capacity::MobiusMassFunction,
    instance::ProblemInstance,
    linear::{LinearModel, Relation},
};
use num_traits::{PrimInt, Signed};

/// Builds mixed-integer linear models maximizing a capacity-based
/// aggregation (WOWA or Choquet integral) of per-criterion satisfactions.
///
/// # Examples
///
/// ```rust
/// use choqlin_linearize::integral::CapacityIntegralLinearizer;
/// use choqlin_model::capacity::MobiusMassFunction;
/// use choqlin_model::instance::ProblemInstance;
///
/// let instance = ProblemInstance::from_rows(
///     vec![vec![10i64, 5, 1], vec![1, 5, 10]],
///     Some(vec![10, 10, 10]),
/// )
/// .unwrap();
/// let masses = MobiusMassFunction::unanimity(2);
/// let model = CapacityIntegralLinearizer::new()
///     .build_selection_model(&instance, &masses, 15.0)
///     .unwrap();
/// assert_eq!(model.name(), "choquet");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityIntegralLinearizer {
    one_to_one: bool,
}

impl Default for CapacityIntegralLinearizer {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl CapacityIntegralLinearizer {
    /// Creates a linearizer with the one-to-one restriction enabled for the
    /// assignment flavor. The restriction has no effect on selection models.
    #[inline]
    pub fn new() -> Self {
        Self { one_to_one: true }
    }

    /// Configures whether each agent may receive at most one item
    /// (assignment flavor only).
    #[inline]
    pub fn one_to_one(mut self, yes: bool) -> Self {
        self.one_to_one = yes;
        self
    }

    /// Builds the WOWA model: capacity-based aggregation of per-agent
    /// satisfactions under item-assignment constraints.
    pub fn build_assignment_model<T>(
        &self,
        instance: &ProblemInstance<T>,
        masses: &MobiusMassFunction,
    ) -> Result<LinearModel, LinearizeError>
    where
        T: PrimInt + Signed,
    {
        Self::check_lattice(instance, masses)?;

        let mut model = LinearModel::new("wowa");
        let vars = submodel::attach_assignment(&mut model, instance, self.one_to_one);
        Self::attach_integral(&mut model, instance.num_criteria(), masses, &vars);

        log::debug!("built {} ({} assignment variables)", model, vars.x.len());
        Ok(model)
    }

    /// Builds the Choquet model: capacity-based aggregation of
    /// per-objective satisfactions under a budgeted project selection.
    ///
    /// The budget is always explicit; the half-total-cost convention is
    /// available as `ProblemInstance::half_cost_budget`.
    pub fn build_selection_model<T>(
        &self,
        instance: &ProblemInstance<T>,
        masses: &MobiusMassFunction,
        budget: f64,
    ) -> Result<LinearModel, LinearizeError>
    where
        T: PrimInt + Signed,
    {
        Self::check_lattice(instance, masses)?;

        let mut model = LinearModel::new("choquet");
        let vars = submodel::attach_selection(&mut model, instance, budget)?;
        Self::attach_integral(&mut model, instance.num_criteria(), masses, &vars);

        log::debug!("built {} ({} selection variables)", model, vars.x.len());
        Ok(model)
    }

    fn check_lattice<T>(
        instance: &ProblemInstance<T>,
        masses: &MobiusMassFunction,
    ) -> Result<(), LinearizeError>
    where
        T: PrimInt + Signed,
    {
        let expected = 1usize << instance.num_criteria();
        if masses.lattice_len() != expected {
            return Err(LinearizeError::MassLatticeMismatch {
                expected,
                actual: masses.lattice_len(),
            });
        }
        Ok(())
    }

    /// Attaches the envelope encoding of the integral: one `y_A` per
    /// subset, bounded above by every member's satisfaction, with the
    /// mass-weighted sum as objective.
    fn attach_integral(
        model: &mut LinearModel,
        num_criteria: usize,
        masses: &MobiusMassFunction,
        vars: &submodel::ValueVars,
    ) {
        let lattice = SubsetLattice::new(num_criteria);
        debug_assert_eq!(lattice.len(), masses.lattice_len());

        let mut y = Vec::with_capacity(lattice.len());
        for (position, subset) in lattice.subsets().iter().enumerate() {
            // The envelope can never exceed its smallest member bound; the
            // empty set has no members and is pinned at zero.
            let upper = subset
                .members()
                .map(|i| vars.z_upper[i])
                .fold(f64::INFINITY, f64::min);
            let upper = if subset.is_empty() { 0.0 } else { upper };
            y.push(model.add_continuous(format!("y_{}", position), 0.0, upper));
        }

        for (position, subset) in lattice.subsets().iter().enumerate().skip(1) {
            for i in subset.members() {
                model.add_constraint(
                    format!("env_{}_{}", position, i),
                    vec![(y[position], 1.0), (vars.z[i], -1.0)],
                    Relation::LessOrEqual,
                    0.0,
                );
            }
        }

        let objective = y
            .iter()
            .enumerate()
            .map(|(position, &var)| (var, masses.mass(SubsetIndex::new(position))))
            .collect();
        model.set_objective(objective);
    }
}
