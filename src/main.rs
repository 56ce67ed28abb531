//! backlog - meeting breakdowns to backlog records

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = backlog_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
