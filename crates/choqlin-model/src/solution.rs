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

use crate::linear::{LinearModel, VarId};
use std::time::Duration;

/// Whether an adapter proved optimality or merely found a feasible point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// The returned assignment is provably optimal.
    Optimal,
    /// The returned assignment is feasible but optimality was not proven.
    Feasible,
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Feasible => write!(f, "Feasible"),
        }
    }
}

/// The result an adapter returns for a `LinearModel`.
///
/// Values are indexed by `VarId` in the order the model declared its
/// variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    status: SolutionStatus,
    objective_value: f64,
    values: Vec<f64>,
    solve_duration: Duration,
}

impl Solution {
    /// Constructs a new `Solution`.
    pub fn new(
        status: SolutionStatus,
        objective_value: f64,
        values: Vec<f64>,
        solve_duration: Duration,
    ) -> Self {
        Self {
            status,
            objective_value,
            values,
            solve_duration,
        }
    }

    /// Returns the solution status.
    #[inline]
    pub fn status(&self) -> SolutionStatus {
        self.status
    }

    /// Returns `true` if optimality was proven.
    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Returns the objective value.
    #[inline]
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Returns the value of a specific variable.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `var` is out of bounds.
    #[inline]
    pub fn value(&self, var: VarId) -> f64 {
        debug_assert!(
            var.get() < self.values.len(),
            "called `Solution::value` with index out of bounds: the len is {} but the index is {}",
            self.values.len(),
            var.get()
        );
        self.values[var.get()]
    }

    /// Returns the value of a variable looked up by name in `model`, or
    /// `None` if the model has no such variable.
    pub fn value_by_name(&self, model: &LinearModel, name: &str) -> Option<f64> {
        model.var_by_name(name).map(|var| self.value(var))
    }

    /// Returns all variable values in `VarId` order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the wall-clock time the adapter spent solving.
    #[inline]
    pub fn solve_duration(&self) -> Duration {
        self.solve_duration
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} solution with objective {} ({} variables, {:.3}s)",
            self.status,
            self.objective_value,
            self.values.len(),
            self.solve_duration.as_secs_f64()
        )
    }
}
