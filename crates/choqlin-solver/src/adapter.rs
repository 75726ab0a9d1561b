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

use choqlin_model::{linear::LinearModel, solution::Solution};
use std::time::Duration;

/// The error type an adapter reports instead of a solution.
///
/// Errors are propagated to the caller unchanged and never retried; in
/// particular a timeout is a result, not a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The constraint set admits no assignment.
    Infeasible,
    /// The objective can be driven arbitrarily high.
    Unbounded,
    /// The time limit elapsed before the search finished.
    Timeout,
    /// The adapter could not process the model; the string describes why.
    Internal(String),
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infeasible => write!(f, "Model is infeasible"),
            Self::Unbounded => write!(f, "Model is unbounded"),
            Self::Timeout => write!(f, "Solve aborted: time limit reached"),
            Self::Internal(reason) => write!(f, "Solver error: {}", reason),
        }
    }
}

impl std::error::Error for SolverError {}

/// The external solving contract.
///
/// An adapter consumes a `LinearModel`, optionally bounded by a wall-clock
/// timeout, and produces either a `Solution` or a typed `SolverError`.
/// Implementations must not panic across this boundary for any model they
/// are handed; a model outside an adapter's supported class is an
/// `Internal` error.
pub trait SolverAdapter {
    /// Returns a short human-readable adapter name.
    fn name(&self) -> &str;

    /// Optimizes the model, maximizing its objective.
    fn solve(
        &self,
        model: &LinearModel,
        timeout: Option<Duration>,
    ) -> Result<Solution, SolverError>;
}
