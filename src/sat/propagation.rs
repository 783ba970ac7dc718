#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Unit propagation.
//!
//! A clause is a unit clause when exactly one of its literals is unassigned,
//! whether or not the clause is already satisfied and whatever its kind. The
//! propagator repeatedly takes the earliest unit clause, makes its remaining
//! literal true, and re-evaluates the whole formula, stopping at the first
//! contradiction.
//!
//! Forcing the literal true is what an OR clause requires. For an at-most-one
//! clause it is only one of the values that keep the clause satisfiable; the
//! rule is applied there as well and search results depend on it.

use crate::sat::cnf::Cnf;
use crate::sat::consistency::{check_consistency, Consistency};
use crate::sat::literal::Variable;
use crate::sat::trail::Reason;
use log::{debug, trace};

/// Outcome of a propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Propagation {
    /// No unit clauses remain. `forced` assignments were made.
    Settled { forced: usize },
    /// Forcing `var` from unit clause `clause` made the formula false.
    Conflict { clause: usize, var: Variable },
}

impl Propagation {
    #[must_use]
    pub const fn is_conflict(self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

pub trait Propagator {
    /// Propagates in place. On conflict the assignments made so far are left
    /// on the formula's trail for the caller to roll back.
    fn propagate(&mut self, cnf: &mut Cnf) -> Propagation;
}

/// The unit propagation rule described in the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitPropagation;

impl Propagator for UnitPropagation {
    fn propagate(&mut self, cnf: &mut Cnf) -> Propagation {
        simplify(cnf)
    }
}

/// Index of the earliest clause with exactly one unassigned literal.
#[must_use]
pub fn first_unit_clause(cnf: &Cnf) -> Option<usize> {
    (0..cnf.len()).find(|&idx| cnf.unassigned_count(idx) == 1)
}

/// Indices of all unit clauses, in clause order.
#[must_use]
pub fn unit_clauses(cnf: &Cnf) -> Vec<usize> {
    (0..cnf.len())
        .filter(|&idx| cnf.unassigned_count(idx) == 1)
        .collect()
}

/// Runs unit propagation on `cnf` in place.
pub fn simplify(cnf: &mut Cnf) -> Propagation {
    let mut forced = 0;

    while let Some(idx) = first_unit_clause(cnf) {
        let Some(lit) = cnf.unassigned_literals(idx).next() else {
            break;
        };
        let value = lit.satisfying_value();
        cnf.assign_var(lit.var, value, Reason::Unit(idx));
        forced += 1;
        trace!("unit clause {idx}: {} = {value}", cnf.name(lit.var));

        if check_consistency(cnf) == Consistency::False {
            debug!(
                "contradiction after forcing {} from clause {idx}",
                cnf.name(lit.var)
            );
            return Propagation::Conflict {
                clause: idx,
                var: lit.var,
            };
        }
    }

    Propagation::Settled { forced }
}

/// Copy-on-write form of [`simplify`]: the simplified clone, or `None` if
/// propagation hits a contradiction. `cnf` itself is left untouched.
#[must_use]
pub fn simplified(cnf: &Cnf) -> Option<Cnf> {
    let mut clone = cnf.clone();
    match simplify(&mut clone) {
        Propagation::Settled { .. } => Some(clone),
        Propagation::Conflict { .. } => None,
    }
}
