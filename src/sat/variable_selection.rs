#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::sat::cnf::Cnf;
use crate::sat::literal::Variable;

pub trait VariableSelection {
    /// The next variable to branch on, or `None` if every clause is fully
    /// assigned.
    fn pick(&self, cnf: &Cnf) -> Option<Variable>;
}

/// Branches on the first unassigned literal of the clause with the fewest
/// unassigned literals. Clauses without unassigned literals are skipped and
/// ties go to the earliest clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortestClause;

impl ShortestClause {
    /// Index of the clause the rule picks.
    #[must_use]
    pub fn shortest_clause(cnf: &Cnf) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for idx in 0..cnf.len() {
            let count = cnf.unassigned_count(idx);
            if count == 0 {
                continue;
            }
            if best.is_none_or(|(_, shortest)| count < shortest) {
                best = Some((idx, count));
            }
        }
        best.map(|(idx, _)| idx)
    }
}

impl VariableSelection for ShortestClause {
    fn pick(&self, cnf: &Cnf) -> Option<Variable> {
        let idx = Self::shortest_clause(cnf)?;
        cnf.unassigned_literals(idx).next().map(|lit| lit.var)
    }
}
