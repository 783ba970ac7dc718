#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Formulas in conjunctive normal form over OR and at-most-one clauses.
//!
//! A [`Cnf`] owns a single variable table: every distinct literal name is
//! interned once and its value lives in one [`Assignment`] slot. Clauses are
//! stored as [`ClauseView`]s, lists of `(variable, negated)` pairs over that
//! table, so two occurrences of a name can never disagree about its value.
//!
//! Writes to the table go through the [`Trail`], which lets a search roll the
//! formula back to any earlier [`Cnf::checkpoint`]. The interned names and the
//! clause views never change after construction and are shared between clones.

use crate::sat::assignment::{Assignment, VarState};
use crate::sat::clause::{Clause, ClauseKind};
use crate::sat::consistency::{check_all, check_values, Consistency};
use crate::sat::error::{Error, Result};
use crate::sat::literal::{Literal, VarLiteral, Variable};
use crate::sat::trail::{Reason, Trail};
use indexmap::IndexSet;
use itertools::Itertools;
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

pub type LiteralStorage = SmallVec<[VarLiteral; 8]>;

/// A clause as stored inside a [`Cnf`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClauseView {
    pub kind: ClauseKind,
    pub literals: LiteralStorage,
}

impl ClauseView {
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VarLiteral> {
        self.literals.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
    names: Arc<IndexSet<String, FxBuildHasher>>,
    clauses: Arc<[ClauseView]>,
    assignment: Assignment,
    trail: Trail,
}

impl Cnf {
    /// Builds the conjunction of `clauses`, in the order given.
    ///
    /// Literals that arrive pre-assigned seed the variable table.
    ///
    /// # Errors
    ///
    /// [`Error::ConflictingAssignment`] if two clauses pre-assign the same name
    /// to different values.
    pub fn new<I>(clauses: I) -> Result<Self>
    where
        I: IntoIterator<Item = Clause>,
    {
        let mut names = IndexSet::<String, FxBuildHasher>::default();
        let mut seeds: Vec<(Variable, bool)> = Vec::new();
        let mut views = Vec::new();

        for clause in clauses {
            let literals = clause
                .iter()
                .map(|lit| {
                    let (var, _) = names.insert_full(lit.name().to_string());
                    if let Some(b) = lit.assignment().value() {
                        seeds.push((var, b));
                    }
                    VarLiteral::new(var, lit.is_negated())
                })
                .collect();
            views.push(ClauseView {
                kind: clause.kind(),
                literals,
            });
        }

        let mut assignment = Assignment::new(names.len());
        for (var, b) in seeds {
            match assignment[var] {
                VarState::Assigned(existing) if existing != b => {
                    return Err(Error::ConflictingAssignment {
                        name: names[var].clone(),
                    });
                }
                _ => {
                    assignment.set(var, b);
                }
            }
        }

        Ok(Self {
            names: Arc::new(names),
            clauses: views.into(),
            assignment,
            trail: Trail::new(),
        })
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClauseView> {
        self.clauses.iter()
    }

    #[must_use]
    pub fn clause_view(&self, idx: usize) -> &ClauseView {
        &self.clauses[idx]
    }

    #[must_use]
    pub const fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    #[must_use]
    pub const fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Number of distinct variable names in the formula.
    #[must_use]
    pub fn unique_variable_count(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn assigned_variable_count(&self) -> usize {
        self.assignment.assigned_count()
    }

    /// Total number of literal occurrences over all clauses.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(ClauseView::len).sum()
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.names.get_index_of(name)
    }

    /// The name interned for `var`.
    ///
    /// # Panics
    ///
    /// If `var` is not a variable of this formula.
    #[must_use]
    pub fn name(&self, var: Variable) -> &str {
        &self.names[var]
    }

    /// The current state of the variable called `name`, or `None` if no clause
    /// mentions it.
    #[must_use]
    pub fn assignment_of(&self, name: &str) -> Option<VarState> {
        self.variable(name).map(|var| self.assignment[var])
    }

    /// The current value of the variable called `name`, if it is assigned.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<bool> {
        self.assignment_of(name).and_then(VarState::value)
    }

    /// Assigns the variable called `name` everywhere it occurs.
    ///
    /// Returns `false`, and changes nothing, if no clause mentions `name`.
    pub fn assign(&mut self, name: &str, value: bool) -> bool {
        self.variable(name).is_some_and(|var| {
            self.assign_var(var, value, Reason::Assigned);
            true
        })
    }

    /// Copy-on-write form of [`Cnf::assign`]. The clone shares the clause
    /// views and the name table with `self`.
    #[must_use]
    pub fn with_assignment(&self, name: &str, value: bool) -> Self {
        let mut clone = self.clone();
        clone.assign(name, value);
        clone
    }

    pub(crate) fn assign_var(&mut self, var: Variable, value: bool, reason: Reason) {
        let previous = self.assignment.set(var, value);
        self.trail.push(var, previous, reason);
    }

    /// A mark that [`Cnf::backtrack_to`] can later roll back to.
    #[must_use]
    pub fn checkpoint(&self) -> usize {
        self.trail.len()
    }

    /// Undoes every assignment made since `mark` was taken.
    pub fn backtrack_to(&mut self, mark: usize) -> usize {
        self.trail.backstep_to(&mut self.assignment, mark)
    }

    /// The literal values of clause `idx`, in clause order.
    pub fn clause_values(&self, idx: usize) -> impl Iterator<Item = Option<bool>> + '_ {
        self.clauses[idx]
            .iter()
            .map(|lit| self.assignment.literal_value(*lit))
    }

    #[must_use]
    pub fn check_clause_at(&self, idx: usize) -> Consistency {
        check_values(self.clauses[idx].kind, self.clause_values(idx))
    }

    #[must_use]
    pub fn unassigned_count(&self, idx: usize) -> usize {
        self.unassigned_literals(idx).count()
    }

    /// Unassigned literals of clause `idx`, in clause order.
    pub fn unassigned_literals(&self, idx: usize) -> impl Iterator<Item = VarLiteral> + '_ {
        self.clauses[idx]
            .iter()
            .copied()
            .filter(|lit| self.assignment[lit.var].is_unassigned())
    }

    /// Snapshots every clause as a stand-alone [`Clause`] carrying the current
    /// assignment.
    #[must_use]
    pub fn clauses(&self) -> Vec<Clause> {
        (0..self.len()).map(|idx| self.clause(idx)).collect()
    }

    /// Snapshot of clause `idx`.
    #[must_use]
    pub fn clause(&self, idx: usize) -> Clause {
        let view = &self.clauses[idx];
        Clause::from_distinct(view.kind, view.iter().map(|lit| self.to_literal(*lit)))
    }

    fn to_literal(&self, lit: VarLiteral) -> Literal {
        let named = Literal::new(self.name(lit.var)).with_negation(lit.negated);
        match self.assignment[lit.var] {
            VarState::Assigned(b) => named.with_assignment(b),
            VarState::Unassigned => named,
        }
    }

    /// Assigned variables and their values, in order of first appearance.
    #[must_use]
    pub fn model(&self) -> Vec<(&str, bool)> {
        self.assignment
            .iter()
            .filter_map(|(var, state)| state.value().map(|b| (self.name(var), b)))
            .collect_vec()
    }

    /// Checks that every clause is satisfied when the variables take the values
    /// in `model`. Variables missing from `model` keep their pre-assigned value,
    /// if any.
    #[must_use]
    pub fn verify(&self, model: &[(&str, bool)]) -> bool {
        let lookup: FxHashMap<&str, bool> = model.iter().copied().collect();
        let value = |lit: &VarLiteral| {
            lookup
                .get(self.name(lit.var))
                .copied()
                .or_else(|| self.assignment.var_value(lit.var))
                .map(|b| b ^ lit.negated)
        };
        check_all(
            self.clauses
                .iter()
                .map(|view| check_values(view.kind, view.iter().map(value))),
        ) == Consistency::True
    }
}

impl TryFrom<Vec<Clause>> for Cnf {
    type Error = Error;

    fn try_from(clauses: Vec<Clause>) -> Result<Self> {
        Self::new(clauses)
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.unique_variable_count(), self.len())?;
        for idx in 0..self.len() {
            writeln!(f, "{}", self.clause(idx))?;
        }
        Ok(())
    }
}
