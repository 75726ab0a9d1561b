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

//! Linearization of the Ordered Weighted Average objective.
//!
//! OWA applies a fixed weight vector to the *ascending sort* of the
//! per-agent satisfactions rather than to the agents themselves. Sorting is
//! not a linear operation, so the encoding introduces, per rank `k`:
//!
//! * an auxiliary variable `y_k`, chained as `y_0 <= y_1 <= ... <= y_{n-1}`;
//! * a row of binary indicators `b_k_i` with `sum_i b_k_i = k`, and the
//!   deactivatable bounds `y_k <= z_i + M * b_k_i`.
//!
//! Exactly `k` agents are excused from bounding rank `k`, so `y_k` is
//! bounded by the `(k+1)`-th smallest satisfaction and, with positive
//! weights on a maximized objective, settles exactly on the k-th order
//! statistic of `z`.
//!
//! The deactivation constant `M` is the total utility sum of the instance,
//! an analytic bound on every attainable satisfaction. An undersized `M`
//! would silently corrupt the optimum, which is why it is derived from the
//! instance rather than configured.

use crate::{error::LinearizeError, submodel};
use choqlin_model::{
    instance::ProblemInstance,
    linear::{LinearModel, Relation},
};
use num_traits::{PrimInt, Signed};

/// Builds mixed-integer linear models maximizing the OWA of per-agent
/// satisfactions under item-assignment constraints.
///
/// # Examples
///
/// ```rust
/// use choqlin_linearize::owa::OwaLinearizer;
/// use choqlin_model::instance::ProblemInstance;
/// use choqlin_model::weights::owa_weights;
///
/// let instance =
///     ProblemInstance::from_rows(vec![vec![10i64, 5], vec![2, 8]], None).unwrap();
/// let weights = owa_weights(2, 2.0);
/// let model = OwaLinearizer::new()
///     .build_model(&instance, &weights)
///     .unwrap();
/// assert_eq!(model.name(), "owa");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwaLinearizer {
    one_to_one: bool,
}

impl Default for OwaLinearizer {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl OwaLinearizer {
    /// Creates a linearizer with the one-to-one restriction enabled, the
    /// conventional setting for fair division of one item per agent.
    #[inline]
    pub fn new() -> Self {
        Self { one_to_one: true }
    }

    /// Configures whether each agent may receive at most one item.
    #[inline]
    pub fn one_to_one(mut self, yes: bool) -> Self {
        self.one_to_one = yes;
        self
    }

    /// Builds the model for the given instance and rank weights.
    ///
    /// `weights[k]` applies to the k-th smallest satisfaction; weights must
    /// be finite and non-negative and there must be exactly one per
    /// criterion.
    pub fn build_model<T>(
        &self,
        instance: &ProblemInstance<T>,
        weights: &[f64],
    ) -> Result<LinearModel, LinearizeError>
    where
        T: PrimInt + Signed,
    {
        let n = instance.num_criteria();
        if weights.len() != n {
            return Err(LinearizeError::WeightCountMismatch {
                expected: n,
                actual: weights.len(),
            });
        }
        for (rank, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(LinearizeError::InvalidWeight { rank, weight });
            }
        }

        let mut model = LinearModel::new("owa");
        let vars = submodel::attach_assignment(&mut model, instance, self.one_to_one);

        let y_upper = vars.z_upper.iter().copied().fold(0.0, f64::max);
        let big_m = instance.total_utility();
        debug_assert!(
            vars.z_upper.iter().all(|&upper| upper <= big_m),
            "deactivation constant must dominate every attainable satisfaction"
        );

        let mut y = Vec::with_capacity(n);
        for k in 0..n {
            y.push(model.add_continuous(format!("y_{}", k), 0.0, y_upper));
        }

        // y_0 <= y_1 <= ... <= y_{n-1}
        for k in 1..n {
            model.add_constraint(
                format!("order_{}", k),
                vec![(y[k - 1], 1.0), (y[k], -1.0)],
                Relation::LessOrEqual,
                0.0,
            );
        }

        // Rank indicators: exactly k agents are excused from bounding rank k.
        for k in 0..n {
            let mut b_row = Vec::with_capacity(n);
            for i in 0..n {
                b_row.push(model.add_binary(format!("b_{}_{}", k, i)));
            }

            for (i, &b) in b_row.iter().enumerate() {
                model.add_constraint(
                    format!("rank_bound_{}_{}", k, i),
                    vec![(y[k], 1.0), (vars.z[i], -1.0), (b, -big_m)],
                    Relation::LessOrEqual,
                    0.0,
                );
            }

            let cardinality_terms = b_row.iter().map(|&b| (b, 1.0)).collect();
            model.add_constraint(
                format!("rank_card_{}", k),
                cardinality_terms,
                Relation::Equal,
                k as f64,
            );
        }

        model.set_objective(y.iter().zip(weights).map(|(&var, &w)| (var, w)).collect());

        log::debug!(
            "built {} ({} assignment variables, M = {})",
            model,
            vars.x.len(),
            big_m
        );

        Ok(model)
    }
}
