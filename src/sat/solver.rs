use crate::sat::cnf::Cnf;

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    pub decisions: usize,
    pub propagations: usize,
    pub conflicts: usize,
    pub backtracks: usize,
    pub max_depth: usize,
}

pub trait Solver {
    /// Decides `cnf`.
    ///
    /// Returns `true` together with a formula whose assignment satisfies every
    /// clause, or `false` if no such assignment exists. In the `false` case the
    /// returned formula carries no useful values.
    fn solve(&mut self, cnf: Cnf) -> (bool, Cnf);

    fn stats(&self) -> SolutionStats;
}
