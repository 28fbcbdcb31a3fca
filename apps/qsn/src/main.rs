//! # QSN
//!
//! Entry point for the `qsn` binary.

use clap::Parser;
use qsn::cli::{Cli, run};
use qsn::config::init_tracing;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
