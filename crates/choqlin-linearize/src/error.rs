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

//! Configuration errors raised before any model building happens.
//!
//! These cover aggregation parameters that are inconsistent with the
//! instance they are applied to. Internal invariant violations (an
//! undersized deactivation constant, a subset-index mismatch) are wiring
//! defects and are guarded with assertions instead; they never surface as
//! values of this type.

/// The error type for linearizer configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum LinearizeError {
    /// The rank weight vector length does not match the criterion count.
    WeightCountMismatch { expected: usize, actual: usize },
    /// A rank weight is negative or not finite.
    InvalidWeight { rank: usize, weight: f64 },
    /// The Möbius mass vector does not span the instance's subset lattice.
    MassLatticeMismatch { expected: usize, actual: usize },
    /// A budgeted selection was requested on an instance without costs.
    MissingCosts,
    /// The budget is negative or not finite.
    InvalidBudget { budget: f64 },
}

impl std::fmt::Display for LinearizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeightCountMismatch { expected, actual } => write!(
                f,
                "Weight vector has {} entries but the instance has {} criteria",
                actual, expected
            ),
            Self::InvalidWeight { rank, weight } => write!(
                f,
                "Weight {} for rank {} must be finite and non-negative",
                weight, rank
            ),
            Self::MassLatticeMismatch { expected, actual } => write!(
                f,
                "Mass vector has {} entries but the instance's subset lattice has {}",
                actual, expected
            ),
            Self::MissingCosts => write!(
                f,
                "Budgeted selection requires an instance with per-item costs"
            ),
            Self::InvalidBudget { budget } => {
                write!(f, "Budget {} must be finite and non-negative", budget)
            }
        }
    }
}

impl std::error::Error for LinearizeError {}
