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

//! A reference adapter that solves small models by exhaustive enumeration.
//!
//! The adapter walks every assignment of the binary variables. For each
//! one it fixes the continuous variables pinned by single-variable
//! equalities, then drives the remaining continuous variables to their
//! greatest feasible point by monotone bound propagation, and keeps the
//! best verified objective.
//!
//! That procedure is exact for the model class the choqlin linearizers
//! emit, which satisfies three structural properties:
//!
//! * every equality row pins exactly one continuous variable;
//! * every inequality row contains at most one positively-signed
//!   continuous variable;
//! * continuous objective coefficients are non-negative, so the greatest
//!   feasible point is optimal once the binaries are fixed.
//!
//! Models outside this class are rejected with `SolverError::Internal`,
//! never silently mis-solved. Enumeration is exponential in the number of
//! binary variables; this is a validation tool for encodings and small
//! instances, not a solving engine.

use crate::adapter::{SolverAdapter, SolverError};
use choqlin_model::{
    linear::{LinearModel, Relation},
    solution::{Solution, SolutionStatus},
};
use std::time::{Duration, Instant};

/// Feasibility tolerance for constraint verification.
const FEASIBILITY_EPS: f64 = 1e-6;

/// The wall clock is consulted once per this many enumerated assignments.
const TIMEOUT_CHECK_MASK: u64 = 0xFF;

/// Default cap on the number of binary variables the adapter will
/// enumerate over.
const DEFAULT_MAX_BINARIES: usize = 24;

/// Terms of a constraint split by variable class. Binary terms address bit
/// positions of the enumeration mask; continuous terms address slots of
/// the dense value vector.
#[derive(Debug, Clone)]
struct SplitTerms {
    bin: Vec<(usize, f64)>,
    cont: Vec<(usize, f64)>,
}

/// A row whose continuous part is empty; decided by the mask alone.
#[derive(Debug, Clone)]
struct BinaryRow {
    terms: SplitTerms,
    relation: Relation,
    rhs: f64,
}

/// An equality pinning one continuous variable to a mask-dependent value.
#[derive(Debug, Clone)]
struct DefRow {
    target: usize,
    coef: f64,
    bin: Vec<(usize, f64)>,
    rhs: f64,
}

/// A `<=`-normalized inequality with exactly one positively-signed
/// continuous variable; propagation caps that variable from above.
#[derive(Debug, Clone)]
struct BoundRow {
    target: usize,
    coef: f64,
    others: Vec<(usize, f64)>,
    bin: Vec<(usize, f64)>,
    rhs: f64,
}

/// An exhaustive-enumeration adapter for small models.
///
/// # Examples
///
/// ```rust
/// use choqlin_model::linear::{LinearModel, Relation};
/// use choqlin_solver::adapter::SolverAdapter;
/// use choqlin_solver::enumeration::EnumerationSolver;
///
/// let mut model = LinearModel::new("knapsack");
/// let a = model.add_binary("a");
/// let b = model.add_binary("b");
/// model.add_constraint("cap", vec![(a, 2.0), (b, 2.0)], Relation::LessOrEqual, 3.0);
/// model.set_objective(vec![(a, 5.0), (b, 4.0)]);
///
/// let solution = EnumerationSolver::new().solve(&model, None).unwrap();
/// assert_eq!(solution.objective_value(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationSolver {
    max_binaries: usize,
}

impl Default for EnumerationSolver {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl EnumerationSolver {
    /// Creates an adapter with the default binary-variable cap.
    #[inline]
    pub fn new() -> Self {
        Self {
            max_binaries: DEFAULT_MAX_BINARIES,
        }
    }

    /// Overrides the cap on enumerable binary variables.
    #[inline]
    pub fn max_binaries(mut self, max_binaries: usize) -> Self {
        self.max_binaries = max_binaries;
        self
    }
}

#[inline(always)]
fn bit(mask: u64, position: usize) -> f64 {
    ((mask >> position) & 1) as f64
}

#[inline(always)]
fn bin_part(terms: &[(usize, f64)], mask: u64) -> f64 {
    terms
        .iter()
        .map(|&(position, coef)| coef * bit(mask, position))
        .sum()
}

#[inline(always)]
fn satisfied(lhs: f64, relation: Relation, rhs: f64) -> bool {
    match relation {
        Relation::LessOrEqual => lhs <= rhs + FEASIBILITY_EPS,
        Relation::GreaterOrEqual => lhs >= rhs - FEASIBILITY_EPS,
        Relation::Equal => (lhs - rhs).abs() <= FEASIBILITY_EPS,
    }
}

impl SolverAdapter for EnumerationSolver {
    fn name(&self) -> &str {
        "enumeration"
    }

    fn solve(
        &self,
        model: &LinearModel,
        timeout: Option<Duration>,
    ) -> Result<Solution, SolverError> {
        let start = Instant::now();

        // Classify variables into mask bits and dense continuous slots.
        let num_vars = model.num_variables();
        let mut bin_slot = vec![usize::MAX; num_vars];
        let mut cont_slot = vec![usize::MAX; num_vars];
        let mut binary_vars = Vec::new();
        let mut cont_vars = Vec::new();
        for (ix, variable) in model.variables().iter().enumerate() {
            if variable.is_binary() {
                bin_slot[ix] = binary_vars.len();
                binary_vars.push(ix);
            } else {
                cont_slot[ix] = cont_vars.len();
                cont_vars.push(ix);
            }
        }

        if binary_vars.len() > self.max_binaries {
            return Err(SolverError::Internal(format!(
                "model has {} binary variables but the enumeration cap is {}",
                binary_vars.len(),
                self.max_binaries
            )));
        }
        for &(var, coef) in model.objective() {
            if cont_slot[var.get()] != usize::MAX && coef < 0.0 {
                return Err(SolverError::Internal(format!(
                    "negative objective coefficient on continuous variable '{}' is outside the supported model class",
                    model.variable(var).name()
                )));
            }
        }

        let num_cont = cont_vars.len();
        let (binary_rows, def_rows, bound_rows, mixed_rows) =
            normalize_rows(model, &bin_slot, &cont_slot)?;

        let mut defined = vec![false; num_cont];
        for def in &def_rows {
            defined[def.target] = true;
        }

        let lower_of: Vec<f64> = cont_vars
            .iter()
            .map(|&ix| model.variables()[ix].lower())
            .collect();
        let upper_of: Vec<f64> = cont_vars
            .iter()
            .map(|&ix| model.variables()[ix].upper())
            .collect();

        log::debug!(
            "enumerating {} with {} binary and {} continuous variables",
            model,
            binary_vars.len(),
            num_cont
        );

        let total_masks: u64 = 1u64 << binary_vars.len();
        let mut vals = vec![0.0f64; num_cont];
        let mut best: Option<(f64, Vec<f64>)> = None;

        'masks: for mask in 0..total_masks {
            if mask & TIMEOUT_CHECK_MASK == 0 {
                if let Some(limit) = timeout {
                    if start.elapsed() >= limit {
                        return Err(SolverError::Timeout);
                    }
                }
            }

            // Cheap reject on rows the mask decides alone.
            for row in &binary_rows {
                if !satisfied(bin_part(&row.terms.bin, mask), row.relation, row.rhs) {
                    continue 'masks;
                }
            }

            // Pin equality-defined variables, start the rest at their
            // declared upper bound.
            vals.copy_from_slice(&upper_of);
            for def in &def_rows {
                let value = (def.rhs - bin_part(&def.bin, mask)) / def.coef;
                if value < lower_of[def.target] - FEASIBILITY_EPS
                    || value > upper_of[def.target] + FEASIBILITY_EPS
                {
                    continue 'masks;
                }
                vals[def.target] = value;
            }

            // Monotone bound propagation towards the greatest feasible
            // point. Dependencies between undefined variables form a chain
            // at worst, so `num_cont` passes reach the fixpoint; one more
            // pass detects a model we cannot handle.
            let mut changed = true;
            for _ in 0..=num_cont {
                if !changed {
                    break;
                }
                changed = false;
                for row in &bound_rows {
                    if defined[row.target] {
                        continue;
                    }
                    let mut cap = row.rhs - bin_part(&row.bin, mask);
                    for &(other, coef) in &row.others {
                        cap -= coef * vals[other];
                    }
                    cap /= row.coef;
                    if cap < vals[row.target] {
                        vals[row.target] = cap;
                        changed = true;
                    }
                }
            }
            if changed {
                return Err(SolverError::Internal(
                    "bound propagation did not converge; the model is outside the supported class"
                        .to_string(),
                ));
            }

            for slot in 0..num_cont {
                if vals[slot] < lower_of[slot] - FEASIBILITY_EPS {
                    continue 'masks;
                }
            }

            // Full verification of every row touching a continuous
            // variable at the propagated point.
            for row in &mixed_rows {
                let mut lhs = bin_part(&row.terms.bin, mask);
                for &(slot, coef) in &row.terms.cont {
                    lhs += coef * vals[slot];
                }
                if !satisfied(lhs, row.relation, row.rhs) {
                    continue 'masks;
                }
            }

            let mut objective = 0.0;
            for &(var, coef) in model.objective() {
                if coef == 0.0 {
                    continue;
                }
                let ix = var.get();
                let value = if bin_slot[ix] != usize::MAX {
                    bit(mask, bin_slot[ix])
                } else {
                    vals[cont_slot[ix]]
                };
                if value.is_infinite() {
                    // A feasible point with an unbounded positively-weighted
                    // variable means the model itself is unbounded.
                    return Err(SolverError::Unbounded);
                }
                objective += coef * value;
            }

            if best.as_ref().map_or(true, |(incumbent, _)| objective > *incumbent) {
                let mut values = vec![0.0; num_vars];
                for (slot, &ix) in binary_vars.iter().enumerate() {
                    values[ix] = bit(mask, slot);
                }
                for (slot, &ix) in cont_vars.iter().enumerate() {
                    values[ix] = vals[slot];
                }
                best = Some((objective, values));
            }
        }

        match best {
            Some((objective, values)) => Ok(Solution::new(
                SolutionStatus::Optimal,
                objective,
                values,
                start.elapsed(),
            )),
            None => Err(SolverError::Infeasible),
        }
    }
}

type NormalizedRows = (Vec<BinaryRow>, Vec<DefRow>, Vec<BoundRow>, Vec<BinaryRow>);

/// Splits and normalizes the model's constraints into the four row shapes
/// the enumeration works with. Rejects rows outside the supported class.
fn normalize_rows(
    model: &LinearModel,
    bin_slot: &[usize],
    cont_slot: &[usize],
) -> Result<NormalizedRows, SolverError> {
    let mut binary_rows = Vec::new();
    let mut def_rows: Vec<DefRow> = Vec::new();
    let mut bound_rows = Vec::new();
    let mut mixed_rows = Vec::new();
    let mut has_def = vec![false; cont_slot.len()];

    for constraint in model.constraints() {
        let mut terms = SplitTerms {
            bin: Vec::new(),
            cont: Vec::new(),
        };
        for &(var, coef) in constraint.terms() {
            if coef == 0.0 {
                continue;
            }
            let ix = var.get();
            if bin_slot[ix] != usize::MAX {
                terms.bin.push((bin_slot[ix], coef));
            } else {
                terms.cont.push((cont_slot[ix], coef));
            }
        }

        let relation = constraint.relation();
        let rhs = constraint.rhs();

        if terms.cont.is_empty() {
            binary_rows.push(BinaryRow {
                terms,
                relation,
                rhs,
            });
            continue;
        }

        // Every continuous row is re-verified after propagation.
        mixed_rows.push(BinaryRow {
            terms: terms.clone(),
            relation,
            rhs,
        });

        match relation {
            Relation::Equal => {
                if terms.cont.len() != 1 {
                    return Err(SolverError::Internal(format!(
                        "equality row '{}' couples {} continuous variables; the supported class pins exactly one",
                        constraint.name(),
                        terms.cont.len()
                    )));
                }
                let (target, coef) = terms.cont[0];
                if !has_def[target] {
                    has_def[target] = true;
                    def_rows.push(DefRow {
                        target,
                        coef,
                        bin: terms.bin,
                        rhs,
                    });
                }
                // Additional equalities on the same variable are plain
                // checks, already collected in mixed_rows.
            }
            Relation::LessOrEqual | Relation::GreaterOrEqual => {
                let sign = if relation == Relation::GreaterOrEqual {
                    -1.0
                } else {
                    1.0
                };
                let cont: Vec<(usize, f64)> = terms
                    .cont
                    .iter()
                    .map(|&(slot, coef)| (slot, sign * coef))
                    .collect();
                let bin: Vec<(usize, f64)> = terms
                    .bin
                    .iter()
                    .map(|&(slot, coef)| (slot, sign * coef))
                    .collect();
                let rhs = sign * rhs;

                let mut positives = cont.iter().filter(|&&(_, coef)| coef > 0.0);
                let positive = positives.next().copied();
                if positives.next().is_some() {
                    return Err(SolverError::Internal(format!(
                        "inequality row '{}' has multiple positively-signed continuous variables; the supported class allows one",
                        constraint.name()
                    )));
                }

                if let Some((target, coef)) = positive {
                    let others = cont
                        .iter()
                        .copied()
                        .filter(|&(slot, _)| slot != target)
                        .collect();
                    bound_rows.push(BoundRow {
                        target,
                        coef,
                        others,
                        bin,
                        rhs,
                    });
                }
                // Rows with no positively-signed continuous variable are
                // plain checks, already collected in mixed_rows.
            }
        }
    }

    Ok((binary_rows, def_rows, bound_rows, mixed_rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_binary_knapsack() {
        let mut model = LinearModel::new("knapsack");
        let a = model.add_binary("a");
        let b = model.add_binary("b");
        let c = model.add_binary("c");
        model.add_constraint(
            "cap",
            vec![(a, 3.0), (b, 2.0), (c, 2.0)],
            Relation::LessOrEqual,
            4.0,
        );
        model.set_objective(vec![(a, 5.0), (b, 4.0), (c, 3.0)]);

        let solution = EnumerationSolver::new().solve(&model, None).unwrap();

        assert!(solution.is_optimal());
        assert_eq!(solution.objective_value(), 7.0);
        assert_eq!(solution.value(a), 0.0);
        assert_eq!(solution.value(b), 1.0);
        assert_eq!(solution.value(c), 1.0);
    }

    #[test]
    fn test_continuous_variable_follows_binary_cap() {
        let mut model = LinearModel::new("mixed");
        let x = model.add_binary("x");
        let y = model.add_continuous("y", 0.0, 10.0);
        // y <= 4 + 2x
        model.add_constraint(
            "cap",
            vec![(y, 1.0), (x, -2.0)],
            Relation::LessOrEqual,
            4.0,
        );
        model.set_objective(vec![(y, 1.0)]);

        let solution = EnumerationSolver::new().solve(&model, None).unwrap();

        assert_eq!(solution.objective_value(), 6.0);
        assert_eq!(solution.value(x), 1.0);
        assert_eq!(solution.value(y), 6.0);
    }

    #[test]
    fn test_equality_definition_is_pinned() {
        let mut model = LinearModel::new("definition");
        let x = model.add_binary("x");
        let z = model.add_continuous("z", 0.0, 10.0);
        // z = 3x
        model.add_constraint("z_def", vec![(z, 1.0), (x, -3.0)], Relation::Equal, 0.0);
        model.set_objective(vec![(z, 1.0)]);

        let solution = EnumerationSolver::new().solve(&model, None).unwrap();

        assert_eq!(solution.objective_value(), 3.0);
        assert_eq!(solution.value(x), 1.0);
        assert_eq!(solution.value(z), 3.0);
    }

    #[test]
    fn test_greater_or_equal_rows_are_honored() {
        let mut model = LinearModel::new("floor");
        let x = model.add_binary("x");
        let y = model.add_continuous("y", 0.0, 10.0);
        // y <= 2 + 3x, y >= 4: forces x = 1.
        model.add_constraint(
            "cap",
            vec![(y, 1.0), (x, -3.0)],
            Relation::LessOrEqual,
            2.0,
        );
        model.add_constraint("floor", vec![(y, 1.0)], Relation::GreaterOrEqual, 4.0);
        // Prefer x = 0 so only the floor forces the flip.
        model.set_objective(vec![(y, 1.0), (x, -0.5)]);

        let solution = EnumerationSolver::new().solve(&model, None).unwrap();

        assert_eq!(solution.value(x), 1.0);
        assert_eq!(solution.value(y), 5.0);
        assert_eq!(solution.objective_value(), 4.5);
    }

    #[test]
    fn test_infeasible_model_is_reported() {
        let mut model = LinearModel::new("impossible");
        let a = model.add_binary("a");
        let b = model.add_binary("b");
        model.add_constraint(
            "need_three",
            vec![(a, 1.0), (b, 1.0)],
            Relation::GreaterOrEqual,
            3.0,
        );
        model.set_objective(vec![(a, 1.0)]);

        let result = EnumerationSolver::new().solve(&model, None);
        assert_eq!(result.unwrap_err(), SolverError::Infeasible);
    }

    #[test]
    fn test_unbounded_model_is_reported() {
        let mut model = LinearModel::new("escape");
        let y = model.add_continuous("y", 0.0, f64::INFINITY);
        model.set_objective(vec![(y, 1.0)]);

        let result = EnumerationSolver::new().solve(&model, None);
        assert_eq!(result.unwrap_err(), SolverError::Unbounded);
    }

    #[test]
    fn test_zero_timeout_aborts() {
        let mut model = LinearModel::new("slow");
        let vars: Vec<_> = (0..20)
            .map(|i| model.add_binary(format!("x_{}", i)))
            .collect();
        model.set_objective(vars.iter().map(|&v| (v, 1.0)).collect());

        let result = EnumerationSolver::new().solve(&model, Some(Duration::ZERO));
        assert_eq!(result.unwrap_err(), SolverError::Timeout);
    }

    #[test]
    fn test_binary_cap_is_enforced() {
        let mut model = LinearModel::new("wide");
        let vars: Vec<_> = (0..30)
            .map(|i| model.add_binary(format!("x_{}", i)))
            .collect();
        model.set_objective(vars.iter().map(|&v| (v, 1.0)).collect());

        let result = EnumerationSolver::new().solve(&model, None);
        assert!(matches!(result, Err(SolverError::Internal(_))));
    }

    #[test]
    fn test_negative_continuous_objective_is_rejected() {
        let mut model = LinearModel::new("reversed");
        let y = model.add_continuous("y", 0.0, 10.0);
        model.set_objective(vec![(y, -1.0)]);

        let result = EnumerationSolver::new().solve(&model, None);
        assert!(matches!(result, Err(SolverError::Internal(_))));
    }

    #[test]
    fn test_coupled_equality_is_rejected() {
        let mut model = LinearModel::new("coupled");
        let y = model.add_continuous("y", 0.0, 10.0);
        let z = model.add_continuous("z", 0.0, 10.0);
        model.add_constraint("tie", vec![(y, 1.0), (z, 1.0)], Relation::Equal, 5.0);
        model.set_objective(vec![(y, 1.0)]);

        let result = EnumerationSolver::new().solve(&model, None);
        assert!(matches!(result, Err(SolverError::Internal(_))));
    }

    #[test]
    fn test_adapter_name() {
        assert_eq!(EnumerationSolver::new().name(), "enumeration");
    }
}
