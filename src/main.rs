//! # amosat
//!
//! `amosat` is a command-line SAT solver for formulas mixing ordinary OR
//! clauses with at-most-one clauses over named variables. Formulas are read in
//! a DIMACS-compatible text format (see `amosat::sat::dimacs`) and solved with
//! DPLL.
//!
//! ## Usage
//!
//! ```sh
//! amosat [OPTIONS] [PATH] [SUBCOMMAND]
//! ```
//!
//! If `PATH` is given without a subcommand, it is treated as a formula file.
//!
//! ### Subcommands
//!
//! 1.  **`file`**: Solve a formula file.
//!     ```sh
//!     amosat file --path <path_to_formula> [OPTIONS]
//!     ```
//!
//! 2.  **`text`**: Solve a formula given on the command line.
//!     ```sh
//!     amosat text --input "a b 0\namo a b 0" [OPTIONS]
//!     ```
//!
//! 3.  **`dir`**: Solve every `.cnf` file below a directory.
//!     ```sh
//!     amosat dir --path <directory> [OPTIONS]
//!     ```
//!
//! 4.  **`completions`**: Print a shell completion script.
//!     ```sh
//!     amosat completions bash
//!     ```
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Log at `debug` level (default: `false`). `RUST_LOG`
//!     takes precedence when set.
//! -   `-v, --verify[=BOOL]`: Verify the model against the formula (default: `true`).
//! -   `-s, --stats[=BOOL]`: Print problem and search statistics (default: `true`).
//! -   `-p, --print-solution`: Print the satisfying assignment (default: `false`).

use clap::{CommandFactory, Parser};
use command_line::cli::{solve_dir, solve_file, solve_text, Cli, Commands};

mod command_line;

/// Global allocator using `tikv-jemallocator` for potentially better performance
/// and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let cli = Cli::parse();

    let level = if cli.common().debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Some(Commands::File { path, common }) => solve_file(&path, &common),
        Some(Commands::Text { input, common }) => solve_text(&input, &common),
        Some(Commands::Dir { path, common }) => solve_dir(&path, &common),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => {
            let Some(path) = cli.path else {
                eprintln!("No command provided. Use --help for more information.");
                std::process::exit(1);
            };
            solve_file(&path, &cli.common)
        }
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
