//! A DPLL SAT solver for formulas built from OR clauses and at-most-one
//! clauses over named boolean variables.
//!
//! ```
//! use amosat::sat::clause::Clause;
//! use amosat::sat::cnf::Cnf;
//! use amosat::sat::dpll::solve;
//! use amosat::sat::literal::Literal;
//!
//! let cnf = Cnf::new([
//!     Clause::or([Literal::new("a"), Literal::new("b")])?,
//!     Clause::at_most_one([Literal::new("a"), Literal::new("b")])?,
//!     Clause::or([Literal::negative("a")])?,
//! ])?;
//! let (solved, result) = solve(cnf);
//! assert!(solved);
//! assert_eq!(result.value_of("b"), Some(true));
//! # Ok::<(), amosat::sat::error::Error>(())
//! ```

/// The `sat` module holds the formula types, the consistency evaluator, unit
/// propagation and the DPLL search.
pub mod sat;
