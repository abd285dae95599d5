// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the testoutput command
//!
//! This module provides the command-line options: where the Go module lives
//! on disk, which import path it has, and logging verbosity.

use std::path::PathBuf;

use clap::Parser;

/// Turn `go test -json` output on stdin into GitHub Actions error annotations
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "testoutput")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Copy test output to stdout as it arrives
    ///
    /// The text of every `output` event is written before any annotation,
    /// so the step log still shows the full test run.
    #[arg(long, default_value = "false")]
    pub passthrough: bool,

    /// Directory of the Go module root
    ///
    /// Relative paths are resolved against the current directory.
    #[arg(long, env = "TESTOUTPUT_ROOT_PATH", default_value = ".")]
    pub root_path: PathBuf,

    /// Import path of the Go module root, e.g. `github.com/org/repo`
    #[arg(long, env = "TESTOUTPUT_ROOT_PKG")]
    pub root_pkg: String,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so stdout only carries workflow commands.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Config {
    /// The module root as an absolute path
    ///
    /// An empty path means the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RootPathUnresolvable` if the current directory
    /// cannot be determined.
    pub fn root_path(&self) -> Result<PathBuf, ConfigError> {
        let path = if self.root_path.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            self.root_path.clone()
        };
        std::path::absolute(&path).map_err(|e| ConfigError::RootPathUnresolvable(path, e))
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Root path could not be made absolute
    #[error("Cannot resolve root path {0}: {1}")]
    RootPathUnresolvable(PathBuf, std::io::Error),
}
