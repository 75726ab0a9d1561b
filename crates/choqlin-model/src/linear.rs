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

//! The solver-agnostic linear model.
//!
//! A `LinearModel` is plain data: variables with types and bounds,
//! constraints as term lists with a relation and right-hand side, and one
//! linear objective that is always maximized. Linearizers build one model
//! per solve; adapters consume it and never mutate it.
//!
//! Everything is `Vec`-ordered. The internal name maps exist purely for
//! lookup and uniqueness checks; no output is ever driven by hash
//! iteration, so two models built from identical inputs are structurally
//! identical down to variable and constraint order.
//!
//! `write_lp` renders the model in CPLEX LP text format. It is the explicit
//! diagnostic counterpart of the ad hoc file dumps optimization scripts
//! tend to accumulate: nothing is written unless the caller asks.

use choqlin_core::utils::index::{TypedIndex, TypedIndexTag};
use rustc_hash::FxHashMap;
use std::io;

/// A tag type for variable indices in a `LinearModel`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VarIdTag;

impl TypedIndexTag for VarIdTag {
    const NAME: &'static str = "VarId";
}

/// A typed index for model variables.
pub type VarId = TypedIndex<VarIdTag>;

/// A tag type for constraint rows in a `LinearModel`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RowIdTag;

impl TypedIndexTag for RowIdTag {
    const NAME: &'static str = "RowId";
}

/// A typed index for model constraints.
pub type RowId = TypedIndex<RowIdTag>;

/// The type of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// A 0/1 variable.
    Binary,
    /// A continuous variable within its bounds.
    Continuous,
}

/// A decision variable: name, kind, and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    kind: VarKind,
    lower: f64,
    upper: f64,
}

impl Variable {
    /// Returns the variable name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variable kind.
    #[inline]
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Returns the lower bound.
    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Returns the upper bound.
    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `true` for binary variables.
    #[inline]
    pub fn is_binary(&self) -> bool {
        self.kind == VarKind::Binary
    }
}

/// The relation of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Left-hand side at most the right-hand side.
    LessOrEqual,
    /// Left-hand side at least the right-hand side.
    GreaterOrEqual,
    /// Left-hand side exactly the right-hand side.
    Equal,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::LessOrEqual => write!(f, "<="),
            Relation::GreaterOrEqual => write!(f, ">="),
            Relation::Equal => write!(f, "="),
        }
    }
}

/// A named linear constraint: term list, relation, right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    name: String,
    terms: Vec<(VarId, f64)>,
    relation: Relation,
    rhs: f64,
}

impl Constraint {
    /// Returns the constraint name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the coefficient terms.
    #[inline]
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Returns the relation.
    #[inline]
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Returns the right-hand side.
    #[inline]
    pub fn rhs(&self) -> f64 {
        self.rhs
    }
}

/// A solver-agnostic mixed-integer linear model with a maximized objective.
///
/// # Examples
///
/// ```rust
/// use choqlin_model::linear::{LinearModel, Relation};
///
/// let mut model = LinearModel::new("toy");
/// let x = model.add_binary("x");
/// let y = model.add_continuous("y", 0.0, 10.0);
/// model.add_constraint("cap", vec![(x, 3.0), (y, 1.0)], Relation::LessOrEqual, 7.0);
/// model.set_objective(vec![(x, 1.0), (y, 2.0)]);
///
/// assert_eq!(model.num_variables(), 2);
/// assert_eq!(model.num_constraints(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LinearModel {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Vec<(VarId, f64)>,
    var_by_name: FxHashMap<String, VarId>,
    row_by_name: FxHashMap<String, RowId>,
}

impl LinearModel {
    /// Creates an empty model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
            var_by_name: FxHashMap::default(),
            row_by_name: FxHashMap::default(),
        }
    }

    /// Returns the model name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a binary variable with the given name.
    ///
    /// # Panics
    ///
    /// Panics if the name is empty, contains whitespace, or is already
    /// taken. Duplicate names are a wiring defect in the builder code, not
    /// a runtime condition.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_variable(name.into(), VarKind::Binary, 0.0, 1.0)
    }

    /// Adds a continuous variable with the given name and bounds.
    ///
    /// # Panics
    ///
    /// Panics on an invalid name (see `add_binary`) or if `lower > upper`
    /// or either bound is NaN.
    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        assert!(
            !lower.is_nan() && !upper.is_nan() && lower <= upper,
            "called `LinearModel::add_continuous` with invalid bounds [{}, {}]",
            lower,
            upper
        );
        self.add_variable(name.into(), VarKind::Continuous, lower, upper)
    }

    fn add_variable(&mut self, name: String, kind: VarKind, lower: f64, upper: f64) -> VarId {
        assert!(
            !name.is_empty() && !name.contains(char::is_whitespace),
            "called `LinearModel::add_variable` with invalid name '{}'",
            name
        );

        let id = VarId::new(self.variables.len());
        let previous = self.var_by_name.insert(name.clone(), id);
        assert!(
            previous.is_none(),
            "called `LinearModel::add_variable` with duplicate name '{}'",
            name
        );

        self.variables.push(Variable {
            name,
            kind,
            lower,
            upper,
        });
        id
    }

    /// Adds a named constraint.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate or invalid name, an empty term list, or a term
    /// referencing a variable the model does not contain.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(VarId, f64)>,
        relation: Relation,
        rhs: f64,
    ) -> RowId {
        let name = name.into();
        assert!(
            !name.is_empty() && !name.contains(char::is_whitespace),
            "called `LinearModel::add_constraint` with invalid name '{}'",
            name
        );
        assert!(
            !terms.is_empty(),
            "called `LinearModel::add_constraint` for '{}' with no terms",
            name
        );
        for &(var, _) in &terms {
            assert!(
                var.get() < self.variables.len(),
                "called `LinearModel::add_constraint` for '{}' with unknown variable {}",
                name,
                var
            );
        }

        let id = RowId::new(self.constraints.len());
        let previous = self.row_by_name.insert(name.clone(), id);
        assert!(
            previous.is_none(),
            "called `LinearModel::add_constraint` with duplicate name '{}'",
            name
        );

        self.constraints.push(Constraint {
            name,
            terms,
            relation,
            rhs,
        });
        id
    }

    /// Sets the (maximized) objective, replacing any previous one.
    ///
    /// # Panics
    ///
    /// Panics if a term references a variable the model does not contain.
    pub fn set_objective(&mut self, terms: Vec<(VarId, f64)>) {
        for &(var, _) in &terms {
            assert!(
                var.get() < self.variables.len(),
                "called `LinearModel::set_objective` with unknown variable {}",
                var
            );
        }
        self.objective = terms;
    }

    /// Returns the number of variables.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Returns the number of constraints.
    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Returns the variables in insertion order.
    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the constraints in insertion order.
    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns the objective terms.
    #[inline]
    pub fn objective(&self) -> &[(VarId, f64)] {
        &self.objective
    }

    /// Returns a variable by id.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `id` is out of bounds.
    #[inline]
    pub fn variable(&self, id: VarId) -> &Variable {
        debug_assert!(
            id.get() < self.variables.len(),
            "called `LinearModel::variable` with index out of bounds: the len is {} but the index is {}",
            self.variables.len(),
            id.get()
        );
        &self.variables[id.get()]
    }

    /// Looks a variable up by name.
    #[inline]
    pub fn var_by_name(&self, name: &str) -> Option<VarId> {
        self.var_by_name.get(name).copied()
    }

    /// Evaluates the objective at a full variable assignment.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the variable count.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        assert_eq!(
            values.len(),
            self.variables.len(),
            "called `LinearModel::objective_value` with {} values for {} variables",
            values.len(),
            self.variables.len()
        );
        self.objective
            .iter()
            .map(|&(var, coef)| coef * values[var.get()])
            .sum()
    }

    /// Writes the model in CPLEX LP text format.
    ///
    /// Zero-coefficient terms are dropped from the rendering; the stored
    /// model is untouched.
    pub fn write_lp<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "\\ LinearModel: {}", self.name)?;
        writeln!(w, "Maximize")?;
        write!(w, " obj: ")?;
        self.write_terms(w, &self.objective)?;
        writeln!(w)?;

        writeln!(w, "Subject To")?;
        for constraint in &self.constraints {
            write!(w, " {}: ", constraint.name)?;
            self.write_terms(w, &constraint.terms)?;
            writeln!(w, " {} {}", constraint.relation, constraint.rhs)?;
        }

        writeln!(w, "Bounds")?;
        for variable in &self.variables {
            if variable.kind == VarKind::Continuous {
                writeln!(
                    w,
                    " {} <= {} <= {}",
                    variable.lower, variable.name, variable.upper
                )?;
            }
        }

        let binaries: Vec<&str> = self
            .variables
            .iter()
            .filter(|variable| variable.is_binary())
            .map(|variable| variable.name.as_str())
            .collect();
        if !binaries.is_empty() {
            writeln!(w, "Binaries")?;
            writeln!(w, " {}", binaries.join(" "))?;
        }

        writeln!(w, "End")
    }

    fn write_terms<W: io::Write>(&self, w: &mut W, terms: &[(VarId, f64)]) -> io::Result<()> {
        let mut first = true;
        for &(var, coef) in terms {
            if coef == 0.0 {
                continue;
            }

            if first {
                if coef < 0.0 {
                    write!(w, "- ")?;
                }
                first = false;
            } else if coef < 0.0 {
                write!(w, " - ")?;
            } else {
                write!(w, " + ")?;
            }

            let magnitude = coef.abs();
            let name = &self.variables[var.get()].name;
            if magnitude == 1.0 {
                write!(w, "{}", name)?;
            } else {
                write!(w, "{} {}", magnitude, name)?;
            }
        }
        if first {
            write!(w, "0")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for LinearModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LinearModel '{}' ({} variables, {} constraints)",
            self.name,
            self.num_variables(),
            self.num_constraints()
        )
    }
}
