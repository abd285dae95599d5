// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testoutput: GitHub Actions annotations for failing Go tests
//!
//! This binary reads `go test -json` output from stdin and writes one
//! `::error` workflow command per failing test to stdout, pointing at the
//! test's declaration when it can be found below the module root.
//!
//! Example:
//!   go test -json ./... | testoutput --root-pkg github.com/org/repo --passthrough

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use testoutput::config::Config;
use testoutput::reporter::output_failures;

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr; stdout carries workflow commands
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    let root_path = match config.root_path() {
        Ok(path) => path,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(2);
        }
    };

    info!(
        root_path = %root_path.display(),
        root_pkg = %config.root_pkg,
        "Reading test events from stdin"
    );

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    match output_failures(
        stdin,
        &mut stdout,
        &root_path,
        &config.root_pkg,
        config.passthrough,
    ) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}
