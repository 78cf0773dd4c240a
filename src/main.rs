//! Binary entry point: parse arguments, run, map failures to exit codes.

use clap::Parser;

use dupecheck::cli::Cli;
use dupecheck::duplicates::FinderError;
use dupecheck::error::{ExitCode, StructuredError};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    let code = match dupecheck::run_app(cli) {
        Ok(code) => code,
        Err(err) => report_failure(&err, json_errors),
    };

    std::process::exit(code.as_i32());
}

/// Print a top-level error to stderr and pick the exit code for it.
///
/// Interruption keeps the conventional 130; everything else surfacing
/// here is a general error. `--json-errors` renders the error as JSON,
/// falling back to the plain line if serialization fails.
fn report_failure(err: &anyhow::Error, json_errors: bool) -> ExitCode {
    let code = match err.downcast_ref::<FinderError>() {
        Some(FinderError::Interrupted) => ExitCode::Interrupted,
        _ => ExitCode::GeneralError,
    };

    let rendered = json_errors
        .then(|| serde_json::to_string_pretty(&StructuredError::new(err, code)).ok())
        .flatten();
    match rendered {
        Some(json) => eprintln!("{json}"),
        None => eprintln!("[{}] Error: {}", code.code_prefix(), err),
    }

    code
}
