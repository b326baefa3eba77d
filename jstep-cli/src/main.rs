//! jstep CLI: run, check, and inspect JVM-subset listings.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, input, or listing error
//! - 3: Internal interpreter error

mod commands;

use clap::{Parser, Subcommand};
use jstep_vm::{Config, DEFAULT_MAX_STEPS};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jstep",
    version,
    about = "Step-bounded interpreter for a subset of JVM bytecode"
)]
struct Cli {
    /// Trace every executed instruction on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a method and print its outcome
    Run {
        /// Listing file
        listing: PathBuf,
        /// Entry method, e.g. jpamb.cases.Simple.divideByN:(I)I
        method: String,
        /// Argument tuple, e.g. "(1, 'a', null)"
        #[arg(allow_hyphen_values = true)]
        input: Option<String>,
        /// Steps before the run is reported as "*"
        #[arg(long, env = "JSTEP_MAX_STEPS", default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: usize,
    },
    /// Assemble a listing and report its size
    Check {
        listing: PathBuf,
    },
    /// Print a listing in canonical form
    Disassemble {
        listing: PathBuf,
    },
    /// List the methods a listing defines
    Methods {
        listing: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("jstep=debug,jstep_vm=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Run {
            listing,
            method,
            input,
            max_steps,
        } => commands::run(
            listing,
            method,
            input.as_deref().unwrap_or(""),
            Config {
                max_steps: *max_steps,
            },
        ),
        Command::Check { listing } => commands::check(listing),
        Command::Disassemble { listing } => commands::disassemble(listing),
        Command::Methods { listing } => commands::methods(listing),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
