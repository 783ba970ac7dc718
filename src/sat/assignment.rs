#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Tri-state variable values and the per-formula variable table.

use crate::sat::literal::VarLiteral;
use core::ops::{Index, IndexMut};

/// The value of a variable: unset, or a concrete boolean.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    #[default]
    Unassigned,
    Assigned(bool),
}

impl VarState {
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    #[must_use]
    pub const fn is_unassigned(&self) -> bool {
        !self.is_assigned()
    }

    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Assigned(true))
    }

    #[must_use]
    pub const fn is_false(&self) -> bool {
        matches!(self, Self::Assigned(false))
    }

    #[must_use]
    pub const fn value(self) -> Option<bool> {
        match self {
            Self::Assigned(b) => Some(b),
            Self::Unassigned => None,
        }
    }
}

impl From<Option<bool>> for VarState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unassigned, Self::Assigned)
    }
}

impl From<bool> for VarState {
    fn from(value: bool) -> Self {
        Self::Assigned(value)
    }
}

/// One [`VarState`] per variable index of a formula.
///
/// This is the single source of truth for variable values; clauses inside a
/// [`crate::sat::cnf::Cnf`] only hold indices into it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

impl Index<usize> for Assignment {
    type Output = VarState;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Assignment {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Assignment {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sets `var` and returns the state it held before.
    pub fn set(&mut self, var: usize, b: bool) -> VarState {
        std::mem::replace(&mut self.0[var], VarState::Assigned(b))
    }

    pub fn restore(&mut self, var: usize, state: VarState) {
        self.0[var] = state;
    }

    #[must_use]
    pub fn var_value(&self, var: usize) -> Option<bool> {
        self.0.get(var).and_then(|s| s.value())
    }

    /// The value of `lit` under this assignment: `negated XOR assignment`.
    #[must_use]
    pub fn literal_value(&self, lit: VarLiteral) -> Option<bool> {
        self.var_value(lit.var).map(|b| b ^ lit.negated)
    }

    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.0.iter().filter(|s| s.is_assigned()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, VarState)> + '_ {
        self.0.iter().copied().enumerate()
    }
}
