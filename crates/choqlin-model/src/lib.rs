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

//! # Choqlin Model
//!
//! **The Core Domain Model for the Choqlin Multi-Criteria Linearization
//! Ecosystem.**
//!
//! This crate defines the data structures exchanged between problem
//! definition (user input), the linearization layer (`choqlin_linearize`),
//! and the solver boundary (`choqlin_solver`).
//!
//! ## Architecture
//!
//! The crate is designed around a strict separation between **construction**
//! and **consumption**:
//!
//! * **`index`**: Strongly-typed wrappers (`CriterionIndex`, `ItemIndex`) to
//!   prevent logical indexing errors between the two axes of an instance.
//! * **`instance`**: The immutable `ProblemInstance` (utility matrix, costs,
//!   counts) and its fail-fast builder, plus random instance generation.
//! * **`loading`**: A whitespace-delimited text loader producing validated
//!   instances.
//! * **`capacity`**: Möbius mass functions over the subset lattice and the
//!   Dirichlet-based random capacity generator.
//! * **`weights`**: Rank weight vectors for ordered weighted averaging.
//! * **`linear`**: The solver-agnostic `LinearModel` (variables, constraints,
//!   objective) with an explicit LP-format diagnostic export.
//! * **`solution`**: The output format an adapter returns for a model.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: Builders and constructors validate inputs eagerly so
//!     the linearizers never see an invalid instance or capacity.
//! 2.  **Determinism**: Every container is `Vec`-ordered; hash maps exist
//!     only for lookup, never to drive iteration, so building a model twice
//!     from the same inputs produces structurally identical output.
//! 3.  **Explicit Randomness**: All random generation takes a caller-supplied
//!     `rand::Rng`; nothing in the crate touches ambient randomness.

pub mod capacity;
pub mod index;
pub mod instance;
pub mod linear;
pub mod loading;
pub mod solution;
pub mod weights;
