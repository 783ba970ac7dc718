#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for a DIMACS-compatible formula format with named variables.
//!
//! The format is line based:
//! - Lines whose first token is `c` (comments) or `p` (the problem line) are
//!   skipped. The counts on the problem line are not checked; they are derived
//!   from the clauses found.
//! - A line starting with `%` ends the data.
//! - Every other line holds clauses. A clause is a run of literal tokens ended
//!   by `0` or by the end of the line, so plain DIMACS files parse unchanged.
//! - A literal token is a variable name, prefixed with `-` when negated and
//!   optionally suffixed with `=true`/`=false` (or `=1`/`=0`) to pre-assign the
//!   variable.
//! - A clause whose first token is a clause kind (`or`, `amo`) has that kind;
//!   clauses are OR clauses otherwise.
//!
//! `Cnf`'s `Display` output is in this format, so formulas written out can be
//! read back.

use crate::sat::clause::{Clause, ClauseKind};
use crate::sat::cnf::Cnf;
use crate::sat::error::{Error, Result};
use crate::sat::literal::Literal;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parses formula text from a `BufRead` source.
///
/// # Errors
///
/// - [`Error::Io`] if reading fails.
/// - [`Error::Parse`] for a malformed literal token.
/// - [`Error::DuplicateLiteral`] and [`Error::ConflictingAssignment`] as
///   raised while building the clauses and the formula.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf> {
    let mut clauses = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace().peekable();

        match tokens.peek() {
            Some(token) if token.starts_with('%') => break,
            None | Some(&"c" | &"p") => {}
            Some(_) => parse_clauses(tokens, idx + 1, &mut clauses)?,
        }
    }

    Cnf::new(clauses)
}

/// Parses formula text held in a string.
///
/// # Errors
///
/// As for [`parse_dimacs`].
pub fn parse_str(input: &str) -> Result<Cnf> {
    parse_dimacs(input.as_bytes())
}

/// Opens and parses the formula file at `path`.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be opened, otherwise as for
/// [`parse_dimacs`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Cnf> {
    let file = File::open(path)?;
    parse_dimacs(BufReader::new(file))
}

fn parse_clauses<'a, I>(tokens: I, line: usize, clauses: &mut Vec<Clause>) -> Result<()>
where
    I: Iterator<Item = &'a str>,
{
    let mut kind = None;
    let mut literals = Vec::new();
    // Whether any token of the current clause has been read.
    let mut open = false;

    for token in tokens {
        if token == "0" {
            clauses.push(Clause::new(
                kind.take().unwrap_or_default(),
                literals.drain(..),
            )?);
            open = false;
            continue;
        }

        if !open {
            open = true;
            if let Ok(k) = token.parse::<ClauseKind>() {
                kind = Some(k);
                continue;
            }
        }
        literals.push(parse_literal(token, line)?);
    }

    if open {
        clauses.push(Clause::new(kind.unwrap_or_default(), literals)?);
    }
    Ok(())
}

fn parse_literal(token: &str, line: usize) -> Result<Literal> {
    let (negated, rest) = token
        .strip_prefix('-')
        .map_or((false, token), |rest| (true, rest));

    let (name, value) = match rest.split_once('=') {
        Some((name, value)) => {
            let Some(b) = parse_value(value) else {
                return Err(Error::Parse {
                    line,
                    message: format!("invalid value `{value}` in literal `{token}`"),
                });
            };
            (name, Some(b))
        }
        None => (rest, None),
    };

    if name.is_empty() {
        return Err(Error::Parse {
            line,
            message: format!("missing variable name in literal `{token}`"),
        });
    }

    let literal = Literal::new(name).with_negation(negated);
    Ok(match value {
        Some(b) => literal.with_assignment(b),
        None => literal,
    })
}

fn parse_value(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
