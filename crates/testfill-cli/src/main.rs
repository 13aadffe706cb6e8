//! # testfill entry point
//!
//! Parses arguments, sets up tracing, runs the selected command, and turns
//! the outcome into an exit status.
//!
//! Anything that is not one of the three commands (including no arguments
//! at all) prints the usage text and exits 1. `--help` and `--version`
//! behave as usual.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use testfill_cli::report;
use testfill_cli::run::{run_command, Command, Settings};
use testfill_cli::usage::usage_text;
use testfill_schema::DEFAULT_SCHEMA_DIR;

/// List, format, or schema-validate JSON test fillers and tests.
#[derive(Parser, Debug)]
#[command(name = "testfill", version, about, long_about = None, disable_help_subcommand = true)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory to search for tests.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Schema directory. Relative paths resolve against the root.
    #[arg(long, global = true, default_value = DEFAULT_SCHEMA_DIR)]
    schema_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            // Printing help can only fail on a closed stdout.
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            if !matches!(
                e.kind(),
                ErrorKind::InvalidSubcommand
                    | ErrorKind::MissingSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                report::say(e.kind().as_str().unwrap_or("invalid arguments"));
            }
            report::say_fatal(usage_text());
            return ExitCode::from(1);
        }
    };

    init_tracing(cli.verbose);
    tracing::debug!(root = %cli.root.display(), schema_dir = %cli.schema_dir.display(), "starting");

    let settings = Settings::new(cli.root, cli.schema_dir);
    match run_command(&cli.command, &settings) {
        Ok(run) if run.is_clean() => ExitCode::SUCCESS,
        Ok(run) => {
            report::say_fatal(run.summary());
            ExitCode::from(run.exit_code())
        }
        Err(e) => {
            report::say_fatal(format_args!("{e:#}"));
            ExitCode::from(1)
        }
    }
}
