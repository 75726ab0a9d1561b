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

//! # Choqlin Linearize
//!
//! Exact mixed-integer linear encodings of three non-linear aggregation
//! objectives over multi-criteria selection and fair-division problems:
//!
//! * **OWA** — fixed weights applied to the ascending sort of per-criterion
//!   satisfactions (`owa::OwaLinearizer`). Sorting is encoded with ordered
//!   auxiliary variables and a rank-indicator matrix deactivated by an
//!   analytically sized constant.
//! * **WOWA** and the **Choquet integral** — Möbius masses applied to
//!   subset-minimum satisfactions (`integral::CapacityIntegralLinearizer`).
//!   Minima are encoded with one envelope variable per criterion subset,
//!   bounded above by every member's satisfaction.
//!
//! Both linearizers share the sub-model that introduces the decision
//! variables and the resource constraints: binary assignment of items to
//! agents (with optional one-to-one restriction) or binary project
//! selection under an explicit budget.
//!
//! Every entry point consumes a validated `ProblemInstance` and produces a
//! fresh `choqlin_model::linear::LinearModel`; nothing here ever talks to a
//! concrete solver. Construction is pure and deterministic: identical
//! inputs yield structurally identical models.

pub mod error;
pub mod integral;
pub mod owa;

mod submodel;
