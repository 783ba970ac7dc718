//! Error types for formula construction, evaluation and parsing.
//!
//! Unsatisfiability is never reported through this type: it is an ordinary
//! outcome of [`crate::sat::solver::Solver::solve`].

use crate::sat::clause::ClauseKind;
use thiserror::Error;

/// The error type for all fallible operations in the `sat` module.
#[derive(Debug, Error)]
pub enum Error {
    /// Two literals with the same name were given to a single clause.
    #[error("duplicate literal `{name}` in clause")]
    DuplicateLiteral {
        /// The repeated literal name.
        name: String,
    },

    /// Two clauses pre-assign the same variable to different values.
    #[error("variable `{name}` is pre-assigned to conflicting values")]
    ConflictingAssignment {
        /// The variable whose pre-assignments disagree.
        name: String,
    },

    /// A kind-specific evaluator was handed a clause of another kind.
    #[error("expected a clause of kind {expected}, got {found}")]
    KindMismatch {
        /// The kind the evaluator handles.
        expected: ClauseKind,
        /// The kind of the clause it was given.
        found: ClauseKind,
    },

    /// A clause kind name that is neither `or` nor `amo`.
    #[error("unknown clause kind `{0}`")]
    UnknownClauseKind(String),

    /// Malformed formula text.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// I/O error while reading a formula.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias.
pub type Result<T> = std::result::Result<T, Error>;
