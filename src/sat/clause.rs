#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Stand-alone clauses: an ordered, name-unique set of [`Literal`]s plus a kind.
//!
//! A `Clause` owns its literals and keeps them partitioned into an assigned and
//! an unassigned subset. It is the input unit for building a
//! [`crate::sat::cnf::Cnf`] and the form in which a formula's clauses are
//! handed back to callers (see [`crate::sat::cnf::Cnf::clauses`]).

use crate::sat::error::{Error, Result};
use crate::sat::literal::Literal;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::str::FromStr;

type LiteralMap = IndexMap<String, Literal, FxBuildHasher>;
type NameSet = IndexSet<String, FxBuildHasher>;

/// How the literals of a clause are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ClauseKind {
    /// At least one literal must be true.
    #[default]
    Or,
    /// No more than one literal may be true.
    AtMostOne,
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Or => write!(f, "or"),
            Self::AtMostOne => write!(f, "amo"),
        }
    }
}

impl FromStr for ClauseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "or" => Ok(Self::Or),
            "amo" | "atmostone" | "at-most-one" | "at_most_one" => Ok(Self::AtMostOne),
            _ => Err(Error::UnknownClauseKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clause {
    kind: ClauseKind,
    literals: LiteralMap,
    assigned: NameSet,
    unassigned: NameSet,
}

impl Clause {
    /// Builds a clause, keeping the literals in the order given.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateLiteral`] if two literals share a name.
    pub fn new<I>(kind: ClauseKind, literals: I) -> Result<Self>
    where
        I: IntoIterator<Item = Literal>,
    {
        let mut map = LiteralMap::default();
        for lit in literals {
            if map.contains_key(lit.name()) {
                return Err(Error::DuplicateLiteral {
                    name: lit.name().to_string(),
                });
            }
            map.insert(lit.name().to_string(), lit);
        }
        Ok(Self::from_unique(kind, map))
    }

    /// Shorthand for an OR clause.
    ///
    /// # Errors
    ///
    /// See [`Clause::new`].
    pub fn or<I: IntoIterator<Item = Literal>>(literals: I) -> Result<Self> {
        Self::new(ClauseKind::Or, literals)
    }

    /// Shorthand for an at-most-one clause.
    ///
    /// # Errors
    ///
    /// See [`Clause::new`].
    pub fn at_most_one<I: IntoIterator<Item = Literal>>(literals: I) -> Result<Self> {
        Self::new(ClauseKind::AtMostOne, literals)
    }

    /// Builds a clause from literals whose names are already known to be
    /// distinct, such as those materialised from a formula's clause views.
    pub(crate) fn from_distinct<I>(kind: ClauseKind, literals: I) -> Self
    where
        I: IntoIterator<Item = Literal>,
    {
        let map = literals
            .into_iter()
            .map(|lit| (lit.name().to_string(), lit))
            .collect();
        Self::from_unique(kind, map)
    }

    fn from_unique(kind: ClauseKind, literals: LiteralMap) -> Self {
        let (assigned, unassigned): (Vec<_>, Vec<_>) = literals
            .values()
            .map(|lit| lit.name().to_string())
            .partition(|name| literals[name.as_str()].is_assigned());

        Self {
            kind,
            assigned: assigned.into_iter().collect(),
            unassigned: unassigned.into_iter().collect(),
            literals,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ClauseKind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.values()
    }

    #[must_use]
    pub fn literal(&self, name: &str) -> Option<&Literal> {
        self.literals.get(name)
    }

    /// Assigns the literal called `name` in place.
    ///
    /// Returns `false`, and changes nothing, if the clause has no such literal.
    pub fn assign(&mut self, name: &str, value: bool) -> bool {
        let Some(lit) = self.literals.get_mut(name) else {
            return false;
        };
        lit.assign(value);
        if let Some(moved) = self.unassigned.shift_take(name) {
            self.assigned.insert(moved);
        }
        true
    }

    /// Copy-on-write form of [`Clause::assign`]: a new clause with the literal
    /// called `name` replaced by an assigned copy.
    #[must_use]
    pub fn with_assignment(&self, name: &str, value: bool) -> Self {
        let literals = self
            .literals
            .iter()
            .map(|(key, lit)| {
                let lit = if key == name {
                    lit.with_assignment(value)
                } else {
                    lit.clone()
                };
                (key.clone(), lit)
            })
            .collect();
        Self::from_unique(self.kind, literals)
    }

    /// Removes the literal called `name` from the clause and from whichever
    /// subset it was in.
    pub fn remove_literal(&mut self, name: &str) -> Option<Literal> {
        let removed = self.literals.shift_remove(name)?;
        self.assigned.shift_remove(name);
        self.unassigned.shift_remove(name);
        Some(removed)
    }

    /// Copy-on-write form of [`Clause::remove_literal`].
    #[must_use]
    pub fn without_literal(&self, name: &str) -> Self {
        let literals = self
            .literals
            .iter()
            .filter(|(key, _)| *key != name)
            .map(|(key, lit)| (key.clone(), lit.clone()))
            .collect();
        Self::from_unique(self.kind, literals)
    }

    #[must_use]
    pub fn assigned_literal_count(&self) -> usize {
        self.assigned.len()
    }

    #[must_use]
    pub fn unassigned_literal_count(&self) -> usize {
        self.unassigned.len()
    }

    /// Assigned literals, in the order they became assigned.
    pub fn assigned_literals(&self) -> impl Iterator<Item = &Literal> {
        self.assigned.iter().map(|name| &self.literals[name.as_str()])
    }

    /// Unassigned literals, in clause order.
    pub fn unassigned_literals(&self) -> impl Iterator<Item = &Literal> {
        self.unassigned.iter().map(|name| &self.literals[name.as_str()])
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ClauseKind::AtMostOne {
            write!(f, "{} ", self.kind)?;
        }
        write!(f, "{} 0", self.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Clause {
        Clause::or([
            Literal::new("a"),
            Literal::negative("b").with_assignment(true),
            Literal::new("c"),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_keeps_order_and_partition() {
        let clause = abc();
        assert_eq!(clause.len(), 3);
        assert_eq!(clause.kind(), ClauseKind::Or);
        let names: Vec<_> = clause.iter().map(Literal::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(clause.assigned_literal_count(), 1);
        assert_eq!(clause.unassigned_literal_count(), 2);
        let unassigned: Vec<_> = clause.unassigned_literals().map(Literal::name).collect();
        assert_eq!(unassigned, vec!["a", "c"]);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let err = Clause::at_most_one([Literal::new("x"), Literal::negative("x")]).unwrap_err();
        assert!(matches!(err, Error::DuplicateLiteral { name } if name == "x"));
    }

    #[test]
    fn test_assign_in_place_moves_literal() {
        let mut clause = abc();
        assert!(clause.assign("c", false));
        assert_eq!(clause.assigned_literal_count(), 2);
        assert_eq!(clause.unassigned_literal_count(), 1);
        assert_eq!(clause.literal("c").unwrap().value(), Some(false));

        // Reassigning keeps the partition unchanged.
        assert!(clause.assign("c", true));
        assert_eq!(clause.assigned_literal_count(), 2);
        assert_eq!(clause.literal("c").unwrap().value(), Some(true));
    }

    #[test]
    fn test_assign_missing_name_is_noop() {
        let mut clause = abc();
        let before = clause.clone();
        assert!(!clause.assign("zzz", true));
        assert_eq!(clause, before);
    }

    #[test]
    fn test_with_assignment_leaves_original() {
        let clause = abc();
        let copy = clause.with_assignment("a", true);
        assert!(!clause.literal("a").unwrap().is_assigned());
        assert!(copy.literal("a").unwrap().is_assigned());
        assert_eq!(copy.unassigned_literal_count(), 1);
        assert_eq!(copy.assigned_literal_count() + copy.unassigned_literal_count(), copy.len());
    }

    #[test]
    fn test_remove_literal() {
        let mut clause = abc();
        let removed = clause.remove_literal("b").unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(clause.len(), 2);
        assert_eq!(clause.assigned_literal_count(), 0);
        assert!(clause.remove_literal("b").is_none());

        let smaller = abc().without_literal("a");
        assert_eq!(smaller.len(), 2);
        assert_eq!(smaller.unassigned_literal_count(), 1);
    }

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!("amo".parse::<ClauseKind>().unwrap(), ClauseKind::AtMostOne);
        assert_eq!("OR".parse::<ClauseKind>().unwrap(), ClauseKind::Or);
        assert!(matches!(
            "xor".parse::<ClauseKind>(),
            Err(Error::UnknownClauseKind(k)) if k == "xor"
        ));
        let amo = Clause::at_most_one([Literal::new("p"), Literal::negative("q")]).unwrap();
        assert_eq!(amo.to_string(), "amo p -q 0");
    }
}
