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

//! # Choqlin Solver
//!
//! The solver boundary of the choqlin ecosystem.
//!
//! The linearizers only ever emit a `LinearModel`; everything that actually
//! optimizes one sits behind the `SolverAdapter` trait defined here.
//! Adapters return a typed `Result`: a `Solution` on success, a
//! `SolverError` (infeasible, unbounded, timeout, internal) otherwise.
//! Failures never cross the boundary as panics.
//!
//! The crate ships one implementation, `enumeration::EnumerationSolver`,
//! which is exact for the restricted model class the choqlin linearizers
//! emit. It exists to validate encodings and solve small instances without
//! an external MILP dependency; production workloads belong on an adapter
//! backed by a real solving engine.

pub mod adapter;
pub mod enumeration;
