#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Literals: a named boolean term with a polarity and a tri-state assignment.
//!
//! [`Literal`] is the caller-facing form used to build clauses. Once a clause
//! is part of a [`crate::sat::cnf::Cnf`], its literals are stored as
//! [`VarLiteral`]s that refer to the formula's variable table by index.

use crate::sat::assignment::VarState;
use std::fmt;

pub type Variable = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    name: String,
    negated: bool,
    assignment: VarState,
}

impl Literal {
    /// An unassigned, unnegated literal.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negated: false,
            assignment: VarState::Unassigned,
        }
    }

    /// An unassigned, negated literal.
    pub fn negative(name: impl Into<String>) -> Self {
        Self::new(name).with_negation(true)
    }

    /// Sets the polarity. Only meant for construction; the polarity of a literal
    /// never changes afterwards.
    #[must_use]
    pub fn with_negation(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    #[must_use]
    pub const fn assignment(&self) -> VarState {
        self.assignment
    }

    /// `None` while unassigned, otherwise `negated XOR assignment`.
    #[must_use]
    pub const fn value(&self) -> Option<bool> {
        match self.assignment {
            VarState::Assigned(b) => Some(b ^ self.negated),
            VarState::Unassigned => None,
        }
    }

    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assignment.is_assigned()
    }

    /// Assigns the underlying variable in place.
    pub const fn assign(&mut self, value: bool) {
        self.assignment = VarState::Assigned(value);
    }

    /// Copy-on-write form of [`Literal::assign`].
    #[must_use]
    pub fn with_assignment(&self, value: bool) -> Self {
        Self {
            name: self.name.clone(),
            negated: self.negated,
            assignment: VarState::Assigned(value),
        }
    }

    /// Assigns the variable so that [`Literal::value`] becomes `true`.
    pub const fn make_true(&mut self) {
        self.assign(!self.negated);
    }

    /// Assigns the variable so that [`Literal::value`] becomes `false`.
    pub const fn make_false(&mut self) {
        self.assign(self.negated);
    }

    #[must_use]
    pub fn made_true(&self) -> Self {
        self.with_assignment(!self.negated)
    }

    #[must_use]
    pub fn made_false(&self) -> Self {
        self.with_assignment(self.negated)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "-")?;
        }
        write!(f, "{}", self.name)?;
        match self.assignment {
            VarState::Assigned(b) => write!(f, "={b}"),
            VarState::Unassigned => Ok(()),
        }
    }
}

/// A literal inside a formula: a variable index and a polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VarLiteral {
    pub var: Variable,
    pub negated: bool,
}

impl VarLiteral {
    #[must_use]
    pub const fn new(var: Variable, negated: bool) -> Self {
        Self { var, negated }
    }

    /// The variable value that makes this literal true.
    #[must_use]
    pub const fn satisfying_value(self) -> bool {
        !self.negated
    }
}
