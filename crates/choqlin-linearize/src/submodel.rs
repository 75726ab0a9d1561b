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

//! The decision sub-models shared by every linearizer.
//!
//! Both aggregation encodings sit on top of the same skeleton: binary
//! decision variables `x`, one continuous satisfaction variable `z_i` per
//! criterion defined by an equality row, and the flavor's resource
//! constraints. The two flavors are item-to-agent assignment (each item
//! given out at most once, optionally at most one item per agent) and
//! budgeted project selection (total cost of selected projects within an
//! explicit budget).
//!
//! Satisfaction variables carry their analytic upper bound, the utility
//! row sum, so downstream encodings can size envelopes and deactivation
//! constants without magic numbers.

use crate::error::LinearizeError;
use choqlin_model::{
    index::{CriterionIndex, ItemIndex},
    instance::ProblemInstance,
    linear::{LinearModel, Relation, VarId},
};
use num_traits::{PrimInt, Signed};

/// Variables introduced by a decision sub-model.
pub(crate) struct ValueVars {
    /// Decision variables: row-major `n*p` for assignment, length `p` for
    /// selection.
    pub x: Vec<VarId>,
    /// Satisfaction variables, one per criterion.
    pub z: Vec<VarId>,
    /// Analytic upper bound of each satisfaction variable.
    pub z_upper: Vec<f64>,
}

fn to_f64<T: PrimInt + Signed>(value: T) -> f64 {
    value
        .to_f64()
        .expect("primitive integer coefficients are representable as f64")
}

/// Attaches the item-to-agent assignment skeleton to `model`.
///
/// Creates `x_{i}_{j}` binaries, `z_{i}` satisfactions with their defining
/// equalities, the per-item uniqueness constraints, and (optionally) the
/// per-agent one-to-one constraints.
pub(crate) fn attach_assignment<T>(
    model: &mut LinearModel,
    instance: &ProblemInstance<T>,
    one_to_one: bool,
) -> ValueVars
where
    T: PrimInt + Signed,
{
    let n = instance.num_criteria();
    let p = instance.num_items();

    let mut x = Vec::with_capacity(n * p);
    for i in 0..n {
        for j in 0..p {
            x.push(model.add_binary(format!("x_{}_{}", i, j)));
        }
    }

    let mut z = Vec::with_capacity(n);
    let mut z_upper = Vec::with_capacity(n);
    for i in 0..n {
        let upper = instance.utility_row_sum(CriterionIndex::new(i));
        z.push(model.add_continuous(format!("z_{}", i), 0.0, upper));
        z_upper.push(upper);
    }

    // z_i is the total utility agent i draws from its items.
    for i in 0..n {
        let mut terms = Vec::with_capacity(p + 1);
        terms.push((z[i], 1.0));
        for j in 0..p {
            let utility = instance.utility(CriterionIndex::new(i), ItemIndex::new(j));
            terms.push((x[i * p + j], -to_f64(utility)));
        }
        model.add_constraint(format!("z_def_{}", i), terms, Relation::Equal, 0.0);
    }

    // Each item is given out at most once.
    for j in 0..p {
        let terms = (0..n).map(|i| (x[i * p + j], 1.0)).collect();
        model.add_constraint(format!("item_once_{}", j), terms, Relation::LessOrEqual, 1.0);
    }

    if one_to_one {
        // Each agent receives at most one item.
        for i in 0..n {
            let terms = (0..p).map(|j| (x[i * p + j], 1.0)).collect();
            model.add_constraint(
                format!("agent_once_{}", i),
                terms,
                Relation::LessOrEqual,
                1.0,
            );
        }
    }

    ValueVars { x, z, z_upper }
}

/// Attaches the budgeted project-selection skeleton to `model`.
///
/// Creates `x_{j}` binaries, `z_{i}` satisfactions with their defining
/// equalities, and the budget constraint. The budget is always explicit;
/// callers wanting the half-total-cost convention compute it via
/// `ProblemInstance::half_cost_budget`.
pub(crate) fn attach_selection<T>(
    model: &mut LinearModel,
    instance: &ProblemInstance<T>,
    budget: f64,
) -> Result<ValueVars, LinearizeError>
where
    T: PrimInt + Signed,
{
    let costs = instance.costs().ok_or(LinearizeError::MissingCosts)?;
    if !budget.is_finite() || budget < 0.0 {
        return Err(LinearizeError::InvalidBudget { budget });
    }

    let n = instance.num_criteria();
    let p = instance.num_items();

    let mut x = Vec::with_capacity(p);
    for j in 0..p {
        x.push(model.add_binary(format!("x_{}", j)));
    }

    let mut z = Vec::with_capacity(n);
    let mut z_upper = Vec::with_capacity(n);
    for i in 0..n {
        let upper = instance.utility_row_sum(CriterionIndex::new(i));
        z.push(model.add_continuous(format!("z_{}", i), 0.0, upper));
        z_upper.push(upper);
    }

    // z_i is the aptitude of the selected portfolio for objective i.
    for i in 0..n {
        let mut terms = Vec::with_capacity(p + 1);
        terms.push((z[i], 1.0));
        for j in 0..p {
            let utility = instance.utility(CriterionIndex::new(i), ItemIndex::new(j));
            terms.push((x[j], -to_f64(utility)));
        }
        model.add_constraint(format!("z_def_{}", i), terms, Relation::Equal, 0.0);
    }

    let budget_terms = (0..p).map(|j| (x[j], to_f64(costs[j]))).collect();
    model.add_constraint("budget", budget_terms, Relation::LessOrEqual, budget);

    Ok(ValueVars { x, z, z_upper })
}
