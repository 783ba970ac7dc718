#![allow(clippy::cast_precision_loss)]

use amosat::sat::clause::ClauseKind;
use amosat::sat::cnf::Cnf;
use amosat::sat::dimacs::{parse_file, parse_str};
use amosat::sat::dpll::Dpll;
use amosat::sat::solver::{SolutionStats, Solver};
use clap::{ArgAction, Args, Parser, Subcommand};
use itertools::Itertools;
use log::debug;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the solver application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "amosat", version, about = "A DPLL solver for OR and at-most-one clauses")]
pub(crate) struct Cli {
    /// An optional path argument. If provided without a subcommand,
    /// it's treated as the path to a formula file to solve.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `dir`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a formula file.
    File {
        /// Path to the formula file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a formula provided as plain text.
    Text {
        /// Formula text (e.g. "a -b 0\namo b c 0").
        /// Each line holds clauses, `0` terminates a clause and a leading `amo`
        /// makes it an at-most-one clause. A literal `\n` is read as a line break.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.cnf` file below a directory.
    Dir {
        /// Path to the directory.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug output, providing more verbose logging during the solving process.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Verify the found solution against the original formula. On by default; `--verify=false` turns it off.
    #[arg(
        short,
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub(crate) verify: bool,

    /// Print performance and problem statistics after solving. On by default; `--stats=false` turns it off.
    #[arg(
        short,
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub(crate) stats: bool,

    /// Enable printing of the satisfying assignment (model) if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,
}

impl Cli {
    /// The options of whichever command was selected.
    pub(crate) fn common(&self) -> &CommonOptions {
        match &self.command {
            Some(
                Commands::File { common, .. }
                | Commands::Text { common, .. }
                | Commands::Dir { common, .. },
            ) => common,
            Some(Commands::Completions { .. }) | None => &self.common,
        }
    }
}

/// Parses and solves the formula file at `path`.
///
/// # Errors
///
/// If the file cannot be read or parsed, or the solution fails verification.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let cnf = parse_file(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    solve_and_report(&cnf, common, Some(path), parse_time)
}

/// Parses and solves a formula given inline.
///
/// # Errors
///
/// If the text cannot be parsed, or the solution fails verification.
pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let cnf = parse_str(&unescape_newlines(input)).map_err(|e| e.to_string())?;
    let parse_time = time.elapsed();

    solve_and_report(&cnf, common, None, parse_time)
}

/// Solves a directory of formula files.
/// This function walks the directory, parses each `.cnf` file,
/// solves it, and reports the results.
///
/// # Errors
///
/// If the path is not a directory, or any file cannot be read or parsed.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }

        if file_path.extension().is_none_or(|ext| ext != "cnf") {
            eprintln!("Skipping non-CNF file: {}", file_path.display());
            continue;
        }

        solve_file(file_path, common)?;
    }

    Ok(())
}

/// Verifies a model found by the solver against the formula it was given.
///
/// # Errors
///
/// If the model does not satisfy every clause.
pub(crate) fn verify_solution(cnf: &Cnf, model: Option<&[(&str, bool)]>) -> Result<(), String> {
    if let Some(model) = model {
        let ok = cnf.verify(model);
        println!("Verified: {ok:?}");
        if !ok {
            return Err("Solution failed verification!".to_string());
        }
    } else {
        println!("UNSAT");
    }
    Ok(())
}

/// Solves `cnf` and reports results including stats and verification.
///
/// # Errors
///
/// If the solution fails verification.
pub(crate) fn solve_and_report(
    cnf: &Cnf,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<(), String> {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    debug!("formula:\n{cnf}");
    debug!(
        "{} variables, {} clauses, {} literals",
        cnf.unique_variable_count(),
        cnf.len(),
        cnf.literal_count()
    );

    let _ = epoch::advance();
    let time = Instant::now();

    let mut solver = Dpll::new();
    let (solved, result) = solver.solve(cnf.clone());

    let elapsed = time.elapsed();
    debug!("solved = {solved} in {elapsed:?}");

    let model = solved.then(|| result.model());

    if common.verify {
        verify_solution(cnf, model.as_deref())?;
    }

    if common.stats {
        let (allocated, resident) = memory_usage().unwrap_or_default();
        print_stats(
            parse_time,
            elapsed,
            cnf,
            &solver.stats(),
            allocated,
            resident,
        );
    }

    if let Some(model) = &model {
        if common.print_solution {
            println!("Solution: {}", format_model(model));
        }
    }

    if solved {
        println!("\nSATISFIABLE");
    } else {
        println!("\nUNSATISFIABLE");
    }
    Ok(())
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
pub(crate) fn memory_usage() -> Option<(f64, f64)> {
    const MIB: f64 = 1024.0 * 1024.0;

    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((allocated as f64 / MIB, resident as f64 / MIB))
}

/// `name=value` pairs separated by spaces.
pub(crate) fn format_model(model: &[(&str, bool)]) -> String {
    model
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .join(" ")
}

/// Shells pass `\n` through literally; treat it as a line break.
pub(crate) fn unescape_newlines(input: &str) -> String {
    input.replace("\\n", "\n")
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    cnf: &Cnf,
    s: &SolutionStats,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = elapsed.as_secs_f64();
    let amo_clauses = cnf
        .iter()
        .filter(|clause| clause.kind == ClauseKind::AtMostOne)
        .count();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", cnf.unique_variable_count());
    stat_line("Pre-assigned variables", cnf.assigned_variable_count());
    stat_line("Clauses", cnf.len());
    stat_line("At-most-one clauses", amo_clauses);
    stat_line("Literals", cnf.literal_count());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}
