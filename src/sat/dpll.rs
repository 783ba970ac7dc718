//! Defines the DPLL (Davis-Putnam-Logemann-Loveland) solver.
//!
//! The search alternates between three steps:
//! 1.  **Evaluation:** the formula is checked with
//!     [`check_consistency`]. A true or false result ends the current branch.
//! 2.  **Unit propagation:** the configured [`Propagator`] forces the remaining
//!     literal of every unit clause. A contradiction ends the branch and rolls
//!     back whatever the propagator assigned.
//! 3.  **Decision:** if the formula is still undetermined, the
//!     [`VariableSelection`] rule picks a variable, which is first tried `true`
//!     and, if that branch fails, `false`.
//!
//! Branches are not explored recursively. Each decision pushes a [`Frame`]
//! holding the trail position before the decision; backtracking rolls the
//! formula's trail back to that position, so the sibling branch starts from
//! exactly the state its parent saw. Search depth is therefore limited by
//! heap memory, not by the call stack, and the result is the one the
//! recursive formulation produces.

use crate::sat::cnf::Cnf;
use crate::sat::consistency::{check_consistency, Consistency};
use crate::sat::literal::Variable;
use crate::sat::propagation::{Propagation, Propagator, UnitPropagation};
use crate::sat::solver::{SolutionStats, Solver};
use crate::sat::trail::{Reason, Step};
use crate::sat::variable_selection::{ShortestClause, VariableSelection};
use log::{debug, trace};

/// A pending decision on the search stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    /// Trail length before the decision was made.
    mark: usize,
    var: Variable,
    /// The value currently being tried; `false` means both have been.
    value: bool,
}

/// What the search found at the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Sat,
    Unsat,
    Branch(Variable),
}

/// Represents a DPLL SAT solver.
///
/// Generic over the propagation rule and the branching rule; the defaults are
/// [`UnitPropagation`] and [`ShortestClause`].
#[derive(Debug, Clone, Default)]
pub struct Dpll<P: Propagator = UnitPropagation, V: VariableSelection = ShortestClause> {
    propagator: P,
    selector: V,
    stats: SolutionStats,
}

impl Dpll {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: Propagator, V: VariableSelection> Dpll<P, V> {
    pub const fn with_components(propagator: P, selector: V) -> Self {
        Self {
            propagator,
            selector,
            stats: SolutionStats {
                decisions: 0,
                propagations: 0,
                conflicts: 0,
                backtracks: 0,
                max_depth: 0,
            },
        }
    }

    /// Evaluates, propagates and, if needed, picks a branching variable.
    ///
    /// On a propagation conflict the formula is rolled back to the state it
    /// had on entry. An undetermined formula the selector finds nothing to
    /// branch on is treated as a failed branch.
    fn visit(&mut self, cnf: &mut Cnf) -> Node {
        match check_consistency(cnf) {
            Consistency::True => return Node::Sat,
            Consistency::False => return Node::Unsat,
            Consistency::Unknown => {}
        }

        let entry = cnf.checkpoint();
        let result = self.propagator.propagate(cnf);
        self.stats.propagations += cnf.checkpoint() - entry;
        match result {
            Propagation::Settled { forced } => {
                if forced > 0 {
                    trace!("propagation forced {forced} values");
                }
            }
            Propagation::Conflict { clause, var } => {
                debug!(
                    "conflict at clause {clause} forcing {} (decision level {})",
                    cnf.name(var),
                    cnf.trail().decision_level()
                );
                log_implications(cnf, entry);
                self.stats.conflicts += 1;
                cnf.backtrack_to(entry);
                return Node::Unsat;
            }
        }

        match check_consistency(cnf) {
            Consistency::True => Node::Sat,
            Consistency::False => Node::Unsat,
            Consistency::Unknown => {
                debug_assert!(
                    cnf.assigned_variable_count() < cnf.unique_variable_count(),
                    "an undetermined formula has an unassigned variable"
                );
                self.selector.pick(cnf).map_or_else(
                    || {
                        debug!("undetermined formula with nothing to branch on");
                        Node::Unsat
                    },
                    Node::Branch,
                )
            }
        }
    }

    fn decide(&mut self, cnf: &mut Cnf, var: Variable, value: bool) {
        cnf.assign_var(var, value, Reason::Decision);
        let depth = cnf.trail().decision_level();
        trace!("decide {} = {value} at depth {depth}", cnf.name(var));
        self.stats.decisions += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
    }
}

impl<P: Propagator, V: VariableSelection> Solver for Dpll<P, V> {
    /// Runs the search described in the module docs.
    ///
    /// When satisfiable, the returned formula is in the state reached at the
    /// satisfying leaf: decisions and propagated values are assigned, anything
    /// the search never needed stays unassigned. When unsatisfiable, it is
    /// `cnf` as it was passed in.
    fn solve(&mut self, mut cnf: Cnf) -> (bool, Cnf) {
        self.stats = SolutionStats::default();
        debug!(
            "solving {} clauses over {} variables",
            cnf.len(),
            cnf.unique_variable_count()
        );
        let root = cnf.checkpoint();
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            match self.visit(&mut cnf) {
                Node::Sat => {
                    debug!("satisfiable after {} decisions", self.stats.decisions);
                    return (true, cnf);
                }
                Node::Branch(var) => {
                    stack.push(Frame {
                        mark: cnf.checkpoint(),
                        var,
                        value: true,
                    });
                    self.decide(&mut cnf, var, true);
                }
                Node::Unsat => loop {
                    let Some(frame) = stack.pop() else {
                        cnf.backtrack_to(root);
                        debug!("unsatisfiable after {} decisions", self.stats.decisions);
                        return (false, cnf);
                    };
                    let undone = cnf.backtrack_to(frame.mark);
                    self.stats.backtracks += 1;
                    trace!("backtrack over {}: undid {undone} steps", cnf.name(frame.var));

                    if frame.value {
                        stack.push(Frame {
                            value: false,
                            ..frame
                        });
                        self.decide(&mut cnf, frame.var, false);
                        break;
                    }
                },
            }
        }
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

/// Traces the values unit propagation forced since trail position `from`.
fn log_implications(cnf: &Cnf, from: usize) {
    for Step { var, reason, .. } in cnf.trail().iter().skip(from) {
        if let Reason::Unit(clause) = reason {
            trace!("  {} forced by clause {clause}", cnf.name(*var));
        }
    }
}

/// Solves `cnf` with a default [`Dpll`].
#[must_use]
pub fn solve(cnf: Cnf) -> (bool, Cnf) {
    Dpll::new().solve(cnf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::Clause;
    use crate::sat::literal::Literal;

    fn or(lits: Vec<Literal>) -> Clause {
        Clause::or(lits).unwrap()
    }

    fn amo(lits: Vec<Literal>) -> Clause {
        Clause::at_most_one(lits).unwrap()
    }

    fn pos(name: &str) -> Literal {
        Literal::new(name)
    }

    fn neg(name: &str) -> Literal {
        Literal::negative(name)
    }

    #[test]
    fn test_single_unit_clause() {
        let cnf = Cnf::new([or(vec![pos("test")])]).unwrap();
        let (solved, result) = solve(cnf);
        assert!(solved);
        assert_eq!(result.value_of("test"), Some(true));
        assert_eq!(result.assigned_variable_count(), result.unique_variable_count());
    }

    #[test]
    fn test_repeated_unit_clauses() {
        let cnf = Cnf::new([or(vec![pos("test")]), or(vec![pos("test")]), or(vec![pos("test")])]).unwrap();
        let (solved, result) = solve(cnf);
        assert!(solved);
        assert_eq!(result.assigned_variable_count(), 1);
    }

    #[test]
    fn test_contradictory_unit_clauses() {
        let cnf = Cnf::new([or(vec![pos("test")]), or(vec![neg("test")]), or(vec![pos("test")])]).unwrap();
        let original = cnf.clone();
        let mut solver = Dpll::new();
        let (solved, result) = solver.solve(cnf);
        assert!(!solved);
        assert_eq!(result.assignment(), original.assignment());
        assert_eq!(solver.stats().conflicts, 1);
        assert_eq!(solver.stats().decisions, 0);
    }

    #[test]
    fn test_one_true_disjunct_is_enough() {
        let cnf = Cnf::new([or(vec![pos("a"), neg("b"), pos("c")])]).unwrap();
        let (solved, result) = solve(cnf);
        assert!(solved);
        assert_eq!(result.assigned_variable_count(), 1);
        assert_eq!(result.value_of("a"), Some(true));
    }

    #[test]
    fn test_empty_formula_is_satisfiable() {
        let cnf = Cnf::new(Vec::<Clause>::new()).unwrap();
        let (solved, result) = solve(cnf);
        assert!(solved);
        assert_eq!(result.unique_variable_count(), 0);
    }

    #[test]
    fn test_already_false_formula() {
        let cnf = Cnf::new([or(vec![pos("a").with_assignment(false)])]).unwrap();
        let mut solver = Dpll::new();
        let (solved, _) = solver.solve(cnf);
        assert!(!solved);
        assert_eq!(solver.stats(), SolutionStats::default());
    }

    #[test]
    fn test_false_branch_is_explored_after_true_fails() {
        // Picking `x` first; x = true forces both y and -y.
        let cnf = Cnf::new([
            or(vec![pos("x"), pos("z")]),
            or(vec![neg("x"), pos("y")]),
            or(vec![neg("x"), neg("y")]),
        ])
        .unwrap();
        let mut solver = Dpll::new();
        let (solved, result) = solver.solve(cnf);
        assert!(solved);
        assert_eq!(result.value_of("x"), Some(false));
        assert_eq!(result.value_of("z"), Some(true));
        let stats = solver.stats();
        assert_eq!(stats.decisions, 2);
        assert_eq!(stats.backtracks, 1);
        assert_eq!(stats.conflicts, 1);
    }

    #[test]
    fn test_at_most_one_with_forced_choice() {
        // Exactly one of p, q, r; p and q are ruled out.
        let cnf = Cnf::new([
            or(vec![pos("p"), pos("q"), pos("r")]),
            amo(vec![pos("p"), pos("q"), pos("r")]),
            or(vec![neg("p")]),
            or(vec![neg("q")]),
        ])
        .unwrap();
        let (solved, result) = solve(cnf);
        assert!(solved);
        assert_eq!(result.model(), vec![("p", false), ("q", false), ("r", true)]);
    }

    #[test]
    fn test_pigeonhole_is_unsatisfiable() {
        // Three pigeons, two holes.
        let mut clauses = Vec::new();
        for p in 0..3 {
            clauses.push(or(vec![pos(&format!("p{p}h0")), pos(&format!("p{p}h1"))]));
        }
        for h in 0..2 {
            clauses.push(amo((0..3).map(|p| pos(&format!("p{p}h{h}"))).collect()));
        }
        let cnf = Cnf::new(clauses).unwrap();
        let original = cnf.clone();
        let (solved, result) = solve(cnf);
        assert!(!solved);
        assert_eq!(result, original);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let build = || {
            Cnf::new([
                or(vec![pos("a"), pos("b")]),
                amo(vec![pos("a"), pos("b"), pos("c")]),
                or(vec![neg("a"), pos("c"), pos("d")]),
            ])
            .unwrap()
        };
        let (s1, r1) = solve(build());
        let (s2, r2) = solve(build());
        assert_eq!(s1, s2);
        assert_eq!(r1.model(), r2.model());
    }

    #[test]
    fn test_deep_search_does_not_recurse() {
        // Every clause needs its own decision. Until the last one, the
        // satisfied clause is a unit clause and forces its second literal;
        // the last decision satisfies the formula before propagation runs.
        let n = 2_000;
        let mut clauses = Vec::with_capacity(n);
        for i in 0..n {
            clauses.push(or(vec![pos(&format!("x{i}")), pos(&format!("y{i}"))]));
        }
        let cnf = Cnf::new(clauses).unwrap();
        let mut solver = Dpll::new();
        let (solved, result) = solver.solve(cnf);
        assert!(solved);
        assert_eq!(solver.stats().max_depth, n);
        assert_eq!(solver.stats().propagations, n - 1);
        assert_eq!(result.assigned_variable_count(), 2 * n - 1);
        assert_eq!(result.value_of(&format!("y{}", n - 1)), None);
    }

    #[test]
    fn test_stats_are_per_solve() {
        let build = || {
            Cnf::new([
                or(vec![pos("x"), pos("z")]),
                or(vec![neg("x"), pos("y")]),
                or(vec![neg("x"), neg("y")]),
            ])
            .unwrap()
        };
        let mut solver = Dpll::new();
        let _ = solver.solve(build());
        let first = solver.stats();
        let _ = solver.solve(build());
        assert_eq!(solver.stats(), first);
        assert_eq!(first.decisions, 2);
    }

    /// Never offers a variable to branch on.
    struct NoBranching;

    impl VariableSelection for NoBranching {
        fn pick(&self, _cnf: &Cnf) -> Option<Variable> {
            None
        }
    }

    #[test]
    fn test_nothing_to_branch_on_fails_the_branch() {
        let cnf = Cnf::new([or(vec![pos("a"), pos("b")])]).unwrap();
        let original = cnf.clone();
        let mut solver = Dpll::with_components(UnitPropagation, NoBranching);
        let (solved, result) = solver.solve(cnf);
        assert!(!solved);
        assert_eq!(result, original);
        assert_eq!(solver.stats().decisions, 0);
    }

    #[test]
    fn test_decision_level_tracks_search_depth() {
        let cnf = Cnf::new([
            or(vec![pos("a"), pos("b"), pos("c")]),
            or(vec![pos("d"), pos("e"), pos("f")]),
        ])
        .unwrap();
        let mut solver = Dpll::new();
        let (solved, result) = solver.solve(cnf);
        assert!(solved);
        assert_eq!(result.trail().decision_level(), solver.stats().max_depth);
        assert_eq!(solver.stats().max_depth, 3);
    }
}
