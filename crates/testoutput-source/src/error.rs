// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for testoutput-source

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while scanning a single Go source file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ScanError {
    /// 1-based line the problem was found on, 0 when not tied to a line
    pub line: usize,
    /// Description of the syntax problem
    pub message: String,
}

/// Errors that can occur while locating a test declaration
#[derive(Debug, Error)]
pub enum LocateError {
    /// The package import path is outside the root package
    #[error("{root_pkg} does not contain {package}")]
    PackageNotUnderRoot {
        /// Import path of the package under test
        package: String,
        /// Import path the root directory corresponds to
        root_pkg: String,
    },

    /// The package directory is missing or not a directory
    #[error("Package directory unavailable {}: {reason}", path.display())]
    DirectoryUnavailable {
        /// Directory that was looked up
        path: PathBuf,
        /// Why it could not be used
        reason: String,
    },

    /// A source file in the package directory could not be read or parsed
    #[error("Failed parsing {}: {message}", path.display())]
    ParseFailed {
        /// File or directory that failed
        path: PathBuf,
        /// Description of the failure
        message: String,
    },
}
