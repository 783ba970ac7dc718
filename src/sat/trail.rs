#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The undo log behind backtracking.
//!
//! Every write to a formula's [`Assignment`] is recorded with the state it
//! replaced, so a search branch can be rolled back by popping steps until the
//! trail is as long as it was when the branch started.

use crate::sat::assignment::{Assignment, VarState};
use crate::sat::literal::Variable;
use std::ops::Index;

/// Why a variable was written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Copy, Hash, PartialOrd, Ord)]
pub enum Reason {
    /// Set by the caller through [`crate::sat::cnf::Cnf::assign`].
    #[default]
    Assigned,
    /// A branching decision of the search.
    Decision,
    /// Forced by unit propagation from the clause at this index.
    Unit(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Step {
    pub var: Variable,
    pub previous: VarState,
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    t: Vec<Step>,
}

impl Index<usize> for Trail {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.t[index]
    }
}

impl Trail {
    #[must_use]
    pub const fn new() -> Self {
        Self { t: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.t.iter()
    }

    /// Number of decisions currently on the trail.
    #[must_use]
    pub fn decision_level(&self) -> usize {
        self.t
            .iter()
            .filter(|s| s.reason == Reason::Decision)
            .count()
    }

    pub fn push(&mut self, var: Variable, previous: VarState, reason: Reason) {
        self.t.push(Step {
            var,
            previous,
            reason,
        });
    }

    /// Undoes every step past `len`, newest first, restoring the states they
    /// replaced. Returns the number of steps undone.
    pub fn backstep_to(&mut self, a: &mut Assignment, len: usize) -> usize {
        let mut undone = 0;
        while self.t.len() > len {
            let Some(step) = self.t.pop() else {
                break;
            };
            a.restore(step.var, step.previous);
            undone += 1;
        }
        undone
    }
}
