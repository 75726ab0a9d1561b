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

//! # Choqlin Core
//!
//! Foundational utilities and combinatorial primitives for the choqlin
//! multi-criteria optimization ecosystem. This crate consolidates the
//! reusable building blocks that the model and linearization crates are
//! built on.
//!
//! ## Modules
//!
//! - `lattice`: Bitmask subsets of a criterion set and the canonical
//!   subset lattice enumerating all of them in a deterministic order
//!   (increasing size, then lexicographic), together with the inverse
//!   subset-to-index bijection.
//! - `math`: Small numeric helpers such as the Lorenz vector used when
//!   comparing the equity of satisfaction profiles.
//! - `utils`: Phantom-tagged, strongly typed indices (`TypedIndex<T>`)
//!   that keep criterion, item, subset, and variable index spaces apart
//!   at compile time.
//!
//! ## Purpose
//!
//! Every component that shares the subset lattice must agree on which
//! integer denotes which subset. Centralizing the enumeration here makes
//! that agreement structural rather than conventional: capacity generation
//! and the linearizers all consume the same `SubsetLattice`.

pub mod lattice;
pub mod math;
pub mod utils;
