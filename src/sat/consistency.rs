#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Three-valued evaluation of clauses and formulas.
//!
//! The rules work on a stream of literal values (`None` for unassigned), so the
//! same code evaluates a stand-alone [`Clause`] and a clause view inside a
//! [`Cnf`].

use crate::sat::clause::{Clause, ClauseKind};
use crate::sat::cnf::Cnf;
use crate::sat::error::{Error, Result};
use std::ops::BitAnd;

/// Outcome of evaluating a clause or formula under a partial assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Consistency {
    True,
    False,
    /// Not yet determined: some literal is unassigned.
    Unknown,
}

impl Consistency {
    #[must_use]
    pub const fn is_determined(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Unknown => None,
        }
    }
}

/// Kleene conjunction.
impl BitAnd for Consistency {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (Self::True, Self::True) => Self::True,
        }
    }
}

/// Disjunction: true on the first true literal.
pub fn check_or<I>(values: I) -> Consistency
where
    I: IntoIterator<Item = Option<bool>>,
{
    let mut incomplete = false;
    for value in values {
        match value {
            Some(true) => return Consistency::True,
            Some(false) => {}
            None => incomplete = true,
        }
    }
    if incomplete {
        Consistency::Unknown
    } else {
        Consistency::False
    }
}

/// At most one literal may be true; false as soon as a second true literal
/// is seen, whatever the rest of the clause holds.
pub fn check_at_most_one<I>(values: I) -> Consistency
where
    I: IntoIterator<Item = Option<bool>>,
{
    let mut count = 0_usize;
    let mut incomplete = false;
    for value in values {
        match value {
            Some(true) => count += 1,
            Some(false) => {}
            None => incomplete = true,
        }
        if count > 1 {
            return Consistency::False;
        }
    }
    if incomplete {
        Consistency::Unknown
    } else {
        Consistency::True
    }
}

/// Dispatches on `kind`.
pub fn check_values<I>(kind: ClauseKind, values: I) -> Consistency
where
    I: IntoIterator<Item = Option<bool>>,
{
    match kind {
        ClauseKind::Or => check_or(values),
        ClauseKind::AtMostOne => check_at_most_one(values),
    }
}

#[must_use]
pub fn check_clause(clause: &Clause) -> Consistency {
    check_values(clause.kind(), clause.iter().map(|lit| lit.value()))
}

/// Evaluates an OR clause.
///
/// # Errors
///
/// [`Error::KindMismatch`] if `clause` is not an OR clause.
pub fn check_or_clause(clause: &Clause) -> Result<Consistency> {
    expect_kind(clause, ClauseKind::Or)?;
    Ok(check_or(clause.iter().map(|lit| lit.value())))
}

/// Evaluates an at-most-one clause.
///
/// # Errors
///
/// [`Error::KindMismatch`] if `clause` is not an at-most-one clause.
pub fn check_at_most_one_clause(clause: &Clause) -> Result<Consistency> {
    expect_kind(clause, ClauseKind::AtMostOne)?;
    Ok(check_at_most_one(clause.iter().map(|lit| lit.value())))
}

fn expect_kind(clause: &Clause, expected: ClauseKind) -> Result<()> {
    if clause.kind() == expected {
        Ok(())
    } else {
        Err(Error::KindMismatch {
            expected,
            found: clause.kind(),
        })
    }
}

/// Folds clause results with [`Consistency`]'s `&`, stopping at the first
/// false clause.
pub fn check_all<I>(clauses: I) -> Consistency
where
    I: IntoIterator<Item = Consistency>,
{
    let mut result = Consistency::True;
    for c in clauses {
        result = result & c;
        if result == Consistency::False {
            return Consistency::False;
        }
    }
    result
}

/// Evaluates the whole formula under its current assignment.
#[must_use]
pub fn check_consistency(cnf: &Cnf) -> Consistency {
    check_all((0..cnf.len()).map(|idx| cnf.check_clause_at(idx)))
}
